//! Read-only bundle handed to rendering collaborators.

use serde::Serialize;

use crate::screening::RecordRejection;
use crate::{ErrorSummary, PredictionRecord, Record, Strategy};

/// Title of the actual-close series in line charts.
pub const ACTUAL_SERIES: &str = "Actual";

/// One line of a predicted-vs-actual chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: &'static str,
    pub values: Vec<f64>,
}

/// Line-chart payload: 1-based sample indices plus one series per line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub labels: Vec<usize>,
    pub series: Vec<ChartSeries>,
}

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet<'a> {
    records: &'a [Record],
    predictions: Vec<PredictionRecord>,
    errors: ErrorSummary,
    rejected: Vec<RecordRejection>,
}

impl<'a> ResultSet<'a> {
    pub fn new(
        records: &'a [Record],
        predictions: Vec<PredictionRecord>,
        errors: ErrorSummary,
        rejected: Vec<RecordRejection>,
    ) -> Self {
        Self {
            records,
            predictions,
            errors,
            rejected,
        }
    }

    /// Every ingested record, including any that were skipped.
    pub fn records(&self) -> &'a [Record] {
        self.records
    }

    pub fn predictions(&self) -> &[PredictionRecord] {
        &self.predictions
    }

    pub fn errors(&self) -> &ErrorSummary {
        &self.errors
    }

    pub fn rejected(&self) -> &[RecordRejection] {
        &self.rejected
    }

    pub fn raw_preview(&self, k: usize) -> &'a [Record] {
        &self.records[..k.min(self.records.len())]
    }

    pub fn prediction_sample(&self, k: usize) -> &[PredictionRecord] {
        &self.predictions[..k.min(self.predictions.len())]
    }

    /// `(label, mae)` pairs for a bar chart, in strategy order.
    pub fn mae_chart(&self) -> Vec<(&'static str, f64)> {
        self.errors
            .iter()
            .map(|entry| (entry.strategy.label(), entry.mae))
            .collect()
    }

    /// Actual close and each strategy over the first `k` predictions.
    pub fn chart_series(&self, k: usize) -> LineChart {
        let sample = self.prediction_sample(k);
        let mut series = Vec::with_capacity(Strategy::ALL.len() + 1);
        series.push(ChartSeries {
            label: ACTUAL_SERIES,
            values: sample.iter().map(|p| p.actual).collect(),
        });
        series.extend(Strategy::ALL.iter().map(|&strategy| ChartSeries {
            label: strategy.column(),
            values: sample.iter().map(|p| p.predicted(strategy)).collect(),
        }));

        LineChart {
            labels: (1..=sample.len()).collect(),
            series,
        }
    }
}
