pub mod stream_writer;

use std::io::{self, Write};

use ferrocast_core::Envelope;
use serde_json::{json, Value};

use self::stream_writer::{NdjsonStreamWriter, StreamEventError};
use crate::cli::OutputFormat;
use crate::error::CliError;

const BAR_WIDTH: f64 = 40.0;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut out, envelope)?;
            } else {
                serde_json::to_writer(&mut out, envelope)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Ndjson => {
            serde_json::to_writer(&mut out, envelope)?;
            writeln!(out)?;
        }
        OutputFormat::Table => render_table(envelope, &mut out)?,
    }

    Ok(())
}

pub fn render_stream(envelope: &Envelope<Value>) -> Result<(), CliError> {
    let stdout = io::stdout();
    write_stream(envelope, stdout.lock())
}

fn write_stream<W: Write>(envelope: &Envelope<Value>, out: W) -> Result<(), CliError> {
    let mut writer = NdjsonStreamWriter::new(out);

    writer.emit_start(Some(json!({
        "request_id": envelope.meta.request_id,
        "trace_id": envelope.meta.trace_id,
        "schema_version": envelope.meta.schema_version,
        "input": envelope.meta.input,
    })))?;

    writer.emit_progress(Some(json!({
        "phase": "ingested",
        "record_count": envelope.meta.record_count,
    })))?;

    writer.emit_progress(Some(json!({
        "phase": if envelope.errors.is_empty() { "evaluated" } else { "aborted" },
        "warning_count": envelope.meta.warnings.len(),
        "error_count": envelope.errors.len(),
    })))?;

    writer.emit_chunk(Some(serde_json::to_value(envelope)?))?;

    for error in &envelope.errors {
        let data = error.position.map(|position| json!({ "position": position }));
        writer.emit_error(
            StreamEventError::new(error.code.clone(), error.message.clone()),
            data,
        )?;
    }

    writer.emit_end(Some(json!({
        "status": if envelope.errors.is_empty() { "ok" } else { "error" },
        "latency_ms": envelope.meta.latency_ms,
    })))?;

    Ok(())
}

fn render_table<W: Write>(envelope: &Envelope<Value>, out: &mut W) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    if let Some(input) = &envelope.meta.input {
        writeln!(out, "input       : {input}")?;
        writeln!(out, "records     : {}", envelope.meta.record_count)?;
    }
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    let data = &envelope.data;
    if let Some(rows) = data.get("raw_preview").and_then(Value::as_array) {
        writeln!(out, "\nRaw data (first {})", rows.len())?;
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                ["symbol", "date", "open", "high", "low", "close", "volume"]
                    .iter()
                    .map(|key| raw_cell(row.get(*key)))
                    .collect::<Vec<_>>()
            })
            .collect();
        write_grid(out, &["symbol", "date", "open", "high", "low", "close", "volume"], body)?;
    }

    if let Some(rows) = data.get("symbols").and_then(Value::as_array) {
        writeln!(out, "\nSymbols")?;
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                vec![
                    raw_cell(row.get("symbol")),
                    raw_cell(row.get("records")),
                    rounded(row.get("average_volume")),
                ]
            })
            .collect();
        write_grid(out, &["symbol", "records", "avg volume"], body)?;
    }

    if let Some(entries) = data.get("mae").and_then(Value::as_array) {
        writeln!(out, "\nMean absolute error")?;
        write_mae_chart(out, entries)?;
        if let Some(best) = data.get("best").filter(|best| !best.is_null()) {
            writeln!(
                out,
                "best: {} ({})",
                raw_cell(best.get("strategy")),
                rounded(best.get("mae"))
            )?;
        }
    }

    if let Some(rows) = data.get("predictions").and_then(Value::as_array) {
        writeln!(out, "\nSample predictions (first {})", rows.len())?;
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                ["actual", "model", "heuristic", "fol", "csp"]
                    .iter()
                    .map(|key| rounded(row.get(*key)))
                    .collect::<Vec<_>>()
            })
            .collect();
        write_grid(out, &["Actual", "Linear Regression", "Heuristic", "FOL", "CSP"], body)?;
    }

    if let Some(rows) = data.get("strategies").and_then(Value::as_array) {
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| vec![raw_cell(row.get("strategy")), raw_cell(row.get("description"))])
            .collect();
        write_grid(out, &["strategy", "rule"], body)?;
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// Horizontal bar per strategy, scaled to the largest error.
fn write_mae_chart<W: Write>(out: &mut W, entries: &[Value]) -> Result<(), CliError> {
    let bars: Vec<(String, f64)> = entries
        .iter()
        .map(|entry| {
            (
                raw_cell(entry.get("strategy")),
                entry.get("mae").and_then(Value::as_f64).unwrap_or(0.0),
            )
        })
        .collect();
    let label_width = bars.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let max = bars.iter().map(|(_, mae)| *mae).fold(0.0_f64, f64::max);

    for (label, mae) in &bars {
        let length = if max > 0.0 {
            (mae / max * BAR_WIDTH).round() as usize
        } else {
            0
        };
        writeln!(out, "{label:<label_width$}  {} {mae:.2}", "#".repeat(length))?;
    }
    Ok(())
}

fn write_grid<W: Write>(out: &mut W, headers: &[&str], rows: Vec<Vec<String>>) -> Result<(), CliError> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(out, "{}", line(headers.to_vec()))?;
    for row in &rows {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}

fn raw_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Two-decimal presentation rounding.
fn rounded(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(|number| format!("{number:.2}"))
        .unwrap_or_default()
}
