use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Pipeline failures are not listed here: they are reported in the envelope's
/// `errors` and exit with code 3.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ferrocast_core::ValidationError),

    #[error("line {line}: {message}")]
    Ingest { line: u64, message: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Ingest { .. } | Self::Csv(_) | Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}
