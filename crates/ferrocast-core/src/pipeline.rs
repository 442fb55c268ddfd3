//! End-to-end run over one batch of records.
//!
//! Each stage logs its counts at `debug`; a completed run logs the best
//! strategy at `info`.

use tracing::{debug, info};

use crate::evaluation::evaluate_all;
use crate::grouping::RecordGrouper;
use crate::prediction::PredictionEngine;
use crate::screening::screen;
use crate::{PipelineConfig, PipelineError, Record, ResultSet};

/// Runs screen → group → predict → evaluate over `records` and packages the result.
///
/// The run is synchronous and all-or-nothing: any error aborts the remaining
/// stages and no partial [`ResultSet`] is returned.
pub fn run_pipeline<'a>(
    records: &'a [Record],
    config: &PipelineConfig,
) -> Result<ResultSet<'a>, PipelineError> {
    let screening = screen(records, config)?;
    debug!(
        accepted = screening.accepted.len(),
        rejected = screening.rejected.len(),
        "screened records"
    );

    let groups = RecordGrouper::group(&screening.accepted)?;
    let aggregates = RecordGrouper::aggregate_all(&groups);
    debug!(symbols = groups.len(), "grouped records by symbol");

    let predictions = PredictionEngine::new(&aggregates).predict_all(&screening.accepted)?;
    debug!(predictions = predictions.len(), "computed strategy predictions");

    let errors = evaluate_all(&predictions)?;
    if let Some(best) = errors.best() {
        info!(
            records = predictions.len(),
            symbols = groups.len(),
            best = %best.strategy,
            best_mae = best.mae,
            "pipeline run complete"
        );
    }

    Ok(ResultSet::new(records, predictions, errors, screening.rejected))
}
