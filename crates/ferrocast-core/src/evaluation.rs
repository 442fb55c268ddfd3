//! Mean absolute error per strategy.
//!
//! Values are full precision; rounding for display is left to renderers.

use serde::{Deserialize, Serialize};

use crate::{PipelineError, PredictionRecord, Strategy};

/// `(1/n) * Σ|actual_i - predicted_i|`.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, PipelineError> {
    if actual.len() != predicted.len() {
        return Err(PipelineError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(total / actual.len() as f64)
}

/// MAE of one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyError {
    pub strategy: Strategy,
    pub mae: f64,
}

/// MAE of every strategy, in [`Strategy::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSummary {
    entries: Vec<StrategyError>,
}

impl ErrorSummary {
    pub fn get(&self, strategy: Strategy) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.strategy == strategy)
            .map(|entry| entry.mae)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyError> {
        self.entries.iter()
    }

    /// Lowest-error strategy; ties go to the earlier one in reporting order.
    pub fn best(&self) -> Option<StrategyError> {
        self.entries.iter().copied().reduce(|best, candidate| {
            if candidate.mae < best.mae {
                candidate
            } else {
                best
            }
        })
    }
}

/// Computes the MAE of each strategy against the shared `actual` series.
pub fn evaluate_all(predictions: &[PredictionRecord]) -> Result<ErrorSummary, PipelineError> {
    let actual: Vec<f64> = predictions.iter().map(|p| p.actual).collect();

    let entries = Strategy::ALL
        .iter()
        .map(|&strategy| {
            let predicted: Vec<f64> = predictions.iter().map(|p| p.predicted(strategy)).collect();
            mean_absolute_error(&actual, &predicted).map(|mae| StrategyError { strategy, mae })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ErrorSummary { entries })
}
