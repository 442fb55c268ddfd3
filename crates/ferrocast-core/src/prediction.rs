//! # Prediction Engine
//!
//! Four fixed next-close strategies evaluated for every screened record:
//!
//! | Strategy | Rule |
//! |----------|------|
//! | Linear Regression | `0.3*open + 0.3*high + 0.3*low + 1e-8*volume` |
//! | Heuristic | `open*1.01` if `open > prev_close` and `volume > avg_volume`, else `open*0.99` |
//! | FOL Rule | `(high+low)/2` if `high > open` and `low < open`, else `open` |
//! | CSP Rule | `(high+low)/2` clamped to `[open*0.95, open*1.05]` |
//!
//! The "linear regression" uses constant coefficients. It is a deliberately
//! naive baseline, not a fitted statistical estimator.
//!
//! Known simplification: the heuristic's average volume is computed over the
//! whole symbol group, including records after the one being predicted, so
//! predictions are NOT strictly causal/online.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::grouping::SymbolAggregates;
use crate::screening::ScreenedRecord;
use crate::{PipelineError, PriceBar, Symbol};

const LINEAR_PRICE_WEIGHT: f64 = 0.3;
const LINEAR_VOLUME_WEIGHT: f64 = 1e-8;
const HEURISTIC_UP: f64 = 1.01;
const HEURISTIC_DOWN: f64 = 0.99;
const CSP_LOWER: f64 = 0.95;
const CSP_UPPER: f64 = 1.05;

/// One of the four competing prediction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "Linear Regression")]
    LinearModel,
    #[serde(rename = "Heuristic")]
    Heuristic,
    #[serde(rename = "FOL Rule")]
    Fol,
    #[serde(rename = "CSP Rule")]
    Csp,
}

impl Strategy {
    /// Every strategy in reporting order.
    pub const ALL: [Strategy; 4] = [
        Strategy::LinearModel,
        Strategy::Heuristic,
        Strategy::Fol,
        Strategy::Csp,
    ];

    /// Stable label used in error summaries and bar charts.
    pub const fn label(self) -> &'static str {
        match self {
            Self::LinearModel => "Linear Regression",
            Self::Heuristic => "Heuristic",
            Self::Fol => "FOL Rule",
            Self::Csp => "CSP Rule",
        }
    }

    /// Short column/series name used by prediction tables and line charts.
    pub const fn column(self) -> &'static str {
        match self {
            Self::LinearModel => "Linear Regression",
            Self::Heuristic => "Heuristic",
            Self::Fol => "FOL",
            Self::Csp => "CSP",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::LinearModel => "0.3*open + 0.3*high + 0.3*low + 1e-8*volume (fixed coefficients, not fitted)",
            Self::Heuristic => {
                "open*1.01 when open > previous close and volume > symbol average volume, else open*0.99"
            }
            Self::Fol => "(high+low)/2 when high > open and low < open, else open",
            Self::Csp => "(high+low)/2 clamped to the band [open*0.95, open*1.05]",
        }
    }

    pub fn predict(self, context: &PredictionContext) -> f64 {
        match self {
            Self::LinearModel => linear_model(&context.bar),
            Self::Heuristic => heuristic(&context.bar, context.prev_close, context.avg_volume),
            Self::Fol => fol_rule(&context.bar),
            Self::Csp => csp_rule(&context.bar),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a strategy may look at for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionContext {
    pub bar: PriceBar,
    /// Close of the preceding record when it has the same symbol, else this record's open.
    pub prev_close: f64,
    pub avg_volume: f64,
}

pub fn linear_model(bar: &PriceBar) -> f64 {
    LINEAR_PRICE_WEIGHT * bar.open
        + LINEAR_PRICE_WEIGHT * bar.high
        + LINEAR_PRICE_WEIGHT * bar.low
        + LINEAR_VOLUME_WEIGHT * bar.volume
}

pub fn heuristic(bar: &PriceBar, prev_close: f64, avg_volume: f64) -> f64 {
    if bar.open > prev_close && bar.volume > avg_volume {
        bar.open * HEURISTIC_UP
    } else {
        bar.open * HEURISTIC_DOWN
    }
}

pub fn fol_rule(bar: &PriceBar) -> f64 {
    if bar.high > bar.open && bar.low < bar.open {
        (bar.high + bar.low) / 2.0
    } else {
        bar.open
    }
}

pub fn csp_rule(bar: &PriceBar) -> f64 {
    let mid = (bar.high + bar.low) / 2.0;
    (bar.open * CSP_LOWER).max(mid.min(bar.open * CSP_UPPER))
}

/// Actual close and the four predictions for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Zero-based row index in the ingested sequence.
    pub position: usize,
    pub symbol: Symbol,
    pub actual: f64,
    pub model: f64,
    pub heuristic: f64,
    pub fol: f64,
    pub csp: f64,
}

impl PredictionRecord {
    pub fn predicted(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::LinearModel => self.model,
            Strategy::Heuristic => self.heuristic,
            Strategy::Fol => self.fol,
            Strategy::Csp => self.csp,
        }
    }
}

/// Produces one [`PredictionRecord`] per screened record, in input order.
#[derive(Debug, Clone)]
pub struct PredictionEngine<'a, 'r> {
    aggregates: &'a SymbolAggregates<'r>,
}

impl<'a, 'r> PredictionEngine<'a, 'r> {
    pub fn new(aggregates: &'a SymbolAggregates<'r>) -> Self {
        Self { aggregates }
    }

    pub fn predict_all(&self, records: &[ScreenedRecord<'_>]) -> Result<Vec<PredictionRecord>, PipelineError> {
        let mut previous: Option<&ScreenedRecord<'_>> = None;
        let mut predictions = Vec::with_capacity(records.len());

        for current in records {
            let context = self.context(current, previous)?;
            predictions.push(PredictionRecord {
                position: current.position,
                symbol: current.symbol().clone(),
                actual: current.bar.close,
                model: Strategy::LinearModel.predict(&context),
                heuristic: Strategy::Heuristic.predict(&context),
                fol: Strategy::Fol.predict(&context),
                csp: Strategy::Csp.predict(&context),
            });
            previous = Some(current);
        }

        Ok(predictions)
    }

    fn context(
        &self,
        current: &ScreenedRecord<'_>,
        previous: Option<&ScreenedRecord<'_>>,
    ) -> Result<PredictionContext, PipelineError> {
        let aggregate = self
            .aggregates
            .get(current.symbol())
            .ok_or_else(|| PipelineError::MissingAggregate {
                position: current.position,
                symbol: current.symbol().to_string(),
            })?;

        let prev_close = previous
            .filter(|prev| prev.symbol() == current.symbol())
            .map_or(current.bar.open, |prev| prev.bar.close);

        Ok(PredictionContext {
            bar: current.bar,
            prev_close,
            avg_volume: aggregate.average(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, high: f64, low: f64, close: f64, volume: f64) -> PriceBar {
        PriceBar::new(open, high, low, close, volume).expect("finite bar")
    }

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn linear_model_uses_fixed_coefficients() {
        let value = linear_model(&bar(10.0, 12.0, 9.0, 11.0, 1000.0));
        assert!(close_to(value, 9.3 + 1e-5), "got {value}");
    }

    #[test]
    fn heuristic_requires_both_gap_up_and_above_average_volume() {
        let b = bar(11.0, 12.0, 10.0, 11.5, 800.0);
        assert!(close_to(heuristic(&b, 10.0, 750.0), 11.11));
        assert!(close_to(heuristic(&b, 11.0, 750.0), 10.89));
        assert!(close_to(heuristic(&b, 10.0, 900.0), 10.89));
    }

    #[test]
    fn fol_takes_midpoint_only_when_open_is_strictly_inside_range() {
        assert_eq!(fol_rule(&bar(10.0, 12.0, 9.0, 11.0, 0.0)), 10.5);
        assert_eq!(fol_rule(&bar(10.0, 10.0, 9.0, 9.5, 0.0)), 10.0);
        assert_eq!(fol_rule(&bar(10.0, 12.0, 10.0, 11.0, 0.0)), 10.0);
    }

    #[test]
    fn csp_clamps_midpoint_to_five_percent_band() {
        assert!(close_to(csp_rule(&bar(10.0, 10.4, 10.0, 10.2, 0.0)), 10.2));
        assert!(close_to(csp_rule(&bar(10.0, 14.0, 12.0, 13.0, 0.0)), 10.5));
        assert!(close_to(csp_rule(&bar(10.0, 8.0, 6.0, 7.0, 0.0)), 9.5));
    }

    #[test]
    fn records_outside_the_aggregates_are_a_wiring_error() {
        let records = vec![crate::Record::ohlcv(
            Symbol::parse("AAL").expect("valid"),
            10.0,
            12.0,
            9.0,
            11.0,
            100.0,
        )];
        let screening = crate::screen(&records, &crate::PipelineConfig::default()).expect("screens");
        let aggregates: SymbolAggregates<'_> = std::collections::HashMap::new();

        let err = PredictionEngine::new(&aggregates)
            .predict_all(&screening.accepted)
            .expect_err("no aggregate for AAL");
        assert_eq!(
            err,
            PipelineError::MissingAggregate {
                position: 0,
                symbol: String::from("AAL"),
            }
        );
        assert_eq!(err.code(), "missing_aggregate");
    }

    #[test]
    fn strategy_labels_are_in_reporting_order() {
        let labels: Vec<&str> = Strategy::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Linear Regression", "Heuristic", "FOL Rule", "CSP Rule"]);
        assert_eq!(
            serde_json::to_string(&Strategy::Fol).expect("serializes"),
            "\"FOL Rule\""
        );
    }
}
