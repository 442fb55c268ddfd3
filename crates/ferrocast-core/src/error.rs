use thiserror::Error;

/// Validation and contract errors exposed by `ferrocast-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("sample size '{name}' must be at least 1")]
    InvalidSampleSize { name: &'static str },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failures of a single pipeline run.
///
/// A run that returns one of these produced no partial result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("no records supplied")]
    EmptyInput,

    #[error("record at position {position} ({symbol}) has a missing or non-numeric '{field}'")]
    InvalidRecord {
        position: usize,
        symbol: String,
        field: &'static str,
    },

    /// A screened record's symbol has no aggregate. Unreachable with correct
    /// pipeline wiring: aggregates are built from the same screened records.
    #[error("no volume aggregate for symbol {symbol} (record at position {position})")]
    MissingAggregate { position: usize, symbol: String },

    /// Actual and predicted series differ in length. Unreachable with correct
    /// pipeline wiring.
    #[error("series length mismatch: actual={actual}, predicted={predicted}")]
    LengthMismatch { actual: usize, predicted: usize },
}

impl PipelineError {
    /// Stable machine-readable code used in envelope and stream errors.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::InvalidRecord { .. } => "invalid_record",
            Self::MissingAggregate { .. } => "missing_aggregate",
            Self::LengthMismatch { .. } => "length_mismatch",
        }
    }
}
