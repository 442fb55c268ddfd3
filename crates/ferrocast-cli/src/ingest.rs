//! CSV ingestion: header-named columns, best-effort numeric coercion.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use ferrocast_core::{Record, Symbol, TradeDate};
use tracing::{debug, warn};

use crate::error::CliError;

const SYMBOL_HEADERS: [&str; 3] = ["name", "symbol", "ticker"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    symbol: usize,
    date: Option<usize>,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, CliError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_ascii_lowercase()).collect();
        let find = |name: &str| lowered.iter().position(|h| h == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| CliError::Ingest {
                line: 1,
                message: format!("missing required column '{name}'"),
            })
        };

        let symbol = SYMBOL_HEADERS
            .iter()
            .find_map(|&name| find(name))
            .ok_or_else(|| CliError::Ingest {
                line: 1,
                message: String::from("missing symbol column (expected 'Name', 'symbol' or 'ticker')"),
            })?;

        let volume = find("volume");
        if volume.is_none() {
            warn!("no 'volume' column; every record has a missing volume");
        }

        Ok(Self {
            symbol,
            date: find("date"),
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume,
        })
    }
}

/// Reads records from a CSV file.
pub fn load_records(path: &Path, delimiter: char) -> Result<Vec<Record>, CliError> {
    let file = File::open(path).map_err(|error| {
        CliError::Command(format!("cannot open '{}': {error}", path.display()))
    })?;
    let records = read_records(BufReader::new(file), delimiter)?;
    debug!(path = %path.display(), records = records.len(), "ingested csv");
    Ok(records)
}

/// Reads records from any CSV source, keeping input order.
///
/// Empty, non-numeric and non-finite numeric cells become `None`, and so does a
/// blank or unparseable symbol. Screening decides what happens to such rows.
pub fn read_records<R: Read>(reader: R, delimiter: char) -> Result<Vec<Record>, CliError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CliError::Command(format!("delimiter '{delimiter}' must be a single ASCII character")))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |position| position.line());

        let symbol = match Symbol::parse(row.get(columns.symbol).unwrap_or_default()) {
            Ok(symbol) => Some(symbol),
            Err(error) => {
                debug!(line, %error, "unusable symbol cell");
                None
            }
        };

        let number = |index: usize| row.get(index).and_then(coerce_number);
        let mut record = Record::new(
            symbol,
            number(columns.open),
            number(columns.high),
            number(columns.low),
            number(columns.close),
            columns.volume.and_then(number),
        );
        if let Some(date) = columns.date.and_then(|index| row.get(index)).and_then(TradeDate::parse) {
            record = record.with_date(date);
        }
        records.push(record);
    }

    Ok(records)
}

fn coerce_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}
