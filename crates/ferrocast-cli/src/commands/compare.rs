use std::time::Instant;

use ferrocast_core::{
    run_pipeline, EnvelopeError, InvalidRecordPolicy, LineChart, PipelineConfig, PredictionRecord, Record,
    RecordRejection, StrategyError,
};
use serde::Serialize;
use tracing::warn;

use crate::cli::CompareArgs;
use crate::error::CliError;
use crate::ingest;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CompareResponseData<'a> {
    raw_preview: &'a [Record],
    mae: Vec<StrategyError>,
    best: Option<StrategyError>,
    predictions: &'a [PredictionRecord],
    line_chart: LineChart,
    rejected: &'a [RecordRejection],
}

pub fn run(args: &CompareArgs) -> Result<CommandResult, CliError> {
    let config = PipelineConfig::default()
        .with_strict_volume(args.strict_volume)
        .with_policy(if args.skip_invalid {
            InvalidRecordPolicy::Skip
        } else {
            InvalidRecordPolicy::Abort
        })
        .with_samples(args.sample, args.preview);
    config.validate()?;

    let started = Instant::now();
    let records = ingest::load_records(&args.input.file, args.input.delimiter)?;
    let input = args.input.file.display().to_string();

    match run_pipeline(&records, &config) {
        Ok(result) => {
            let latency_ms = elapsed_ms(started);
            let warnings = result.rejected().iter().map(RecordRejection::message).collect();
            let data = serde_json::to_value(CompareResponseData {
                raw_preview: result.raw_preview(config.raw_preview),
                mae: result.errors().iter().copied().collect(),
                best: result.errors().best(),
                predictions: result.prediction_sample(config.prediction_sample),
                line_chart: result.chart_series(config.prediction_sample),
                rejected: result.rejected(),
            })?;

            Ok(CommandResult::ok(data)
                .with_input(input, records.len())
                .with_warnings(warnings)
                .with_latency(latency_ms))
        }
        Err(error) => {
            warn!(%error, "pipeline run failed");
            Ok(CommandResult::ok(serde_json::Value::Null)
                .with_input(input, records.len())
                .with_errors(vec![EnvelopeError::from(&error)])
                .with_latency(elapsed_ms(started)))
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
