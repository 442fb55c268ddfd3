use ferrocast_core::{screen, InvalidRecordPolicy, PipelineConfig, PipelineError, Record, RecordGrouper, RecordRejection};
use serde::Serialize;

use crate::cli::PreviewArgs;
use crate::error::CliError;
use crate::ingest;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SymbolSummary {
    symbol: String,
    records: usize,
    average_volume: f64,
}

#[derive(Debug, Serialize)]
struct PreviewResponseData<'a> {
    raw_preview: &'a [Record],
    symbols: Vec<SymbolSummary>,
}

pub fn run(args: &PreviewArgs) -> Result<CommandResult, CliError> {
    let config = PipelineConfig::default()
        .with_policy(InvalidRecordPolicy::Skip)
        .with_samples(1, args.limit);
    config.validate()?;

    let records = ingest::load_records(&args.input.file, args.input.delimiter)?;
    let input = args.input.file.display().to_string();

    let (symbols, warnings) = match screen(&records, &config) {
        Ok(screening) => {
            let groups = RecordGrouper::group(&screening.accepted)
                .map_err(|error| CliError::Command(error.to_string()))?;
            let symbols = groups
                .iter()
                .map(|group| {
                    let aggregate = RecordGrouper::aggregate(group);
                    SymbolSummary {
                        symbol: group.symbol().to_string(),
                        records: aggregate.count(),
                        average_volume: aggregate.average(),
                    }
                })
                .collect();
            let warnings = screening.rejected.iter().map(RecordRejection::message).collect();
            (symbols, warnings)
        }
        // Every record was unusable (or there were none): still show the raw rows.
        Err(PipelineError::EmptyInput) => (
            Vec::new(),
            vec![String::from("no usable records for per-symbol statistics")],
        ),
        Err(error) => return Err(CliError::Command(error.to_string())),
    };

    let data = serde_json::to_value(PreviewResponseData {
        raw_preview: &records[..args.limit.min(records.len())],
        symbols,
    })?;

    Ok(CommandResult::ok(data)
        .with_input(input, records.len())
        .with_warnings(warnings))
}
