//! # Ferrocast Core
//!
//! Compares four next-close prediction strategies over a batch of OHLCV
//! records and reports the mean absolute error of each.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Run configuration and invalid-record policy |
//! | [`domain`] | Records, symbols, dates |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`evaluation`] | Mean absolute error per strategy |
//! | [`grouping`] | Per-symbol partition and volume aggregates |
//! | [`pipeline`] | The end-to-end run |
//! | [`prediction`] | The four strategies and the prediction engine |
//! | [`result_set`] | Read-only output bundle and sample views |
//! | [`screening`] | Record validation before grouping |
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrocast_core::{run_pipeline, PipelineConfig, Record, Strategy, Symbol};
//!
//! let symbol = Symbol::parse("AAL").unwrap();
//! let records = vec![
//!     Record::ohlcv(symbol.clone(), 10.0, 12.0, 9.0, 11.0, 1000.0),
//!     Record::ohlcv(symbol, 11.0, 11.0, 10.0, 10.5, 500.0),
//! ];
//!
//! let result = run_pipeline(&records, &PipelineConfig::default()).unwrap();
//! let heuristic = result.predictions()[1].heuristic;
//! assert!((heuristic - 10.89).abs() < 1e-9);
//! assert!(result.errors().get(Strategy::Csp).is_some());
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! records ──▶ screen ──▶ group + aggregate ──▶ predict ──▶ evaluate ──▶ ResultSet
//! ```
//!
//! Runs are synchronous, single pass and all-or-nothing. Records with a
//! missing price field abort the run unless [`InvalidRecordPolicy::Skip`] is
//! configured.

pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod evaluation;
pub mod grouping;
pub mod pipeline;
pub mod prediction;
pub mod result_set;
pub mod screening;

pub use config::{InvalidRecordPolicy, PipelineConfig, DEFAULT_PREDICTION_SAMPLE, DEFAULT_RAW_PREVIEW};
pub use domain::{PriceBar, Record, Symbol, TradeDate, UtcDateTime};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{PipelineError, ValidationError};
pub use evaluation::{evaluate_all, mean_absolute_error, ErrorSummary, StrategyError};
pub use grouping::{RecordGrouper, SymbolAggregate, SymbolAggregates, SymbolGroup, SymbolGroups};
pub use pipeline::run_pipeline;
pub use prediction::{PredictionContext, PredictionEngine, PredictionRecord, Strategy};
pub use result_set::{ChartSeries, LineChart, ResultSet};
pub use screening::{screen, RecordRejection, ScreenedRecord, Screening};
