mod compare;
mod preview;
mod strategies;

use ferrocast_core::{Envelope, EnvelopeError};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub input: Option<String>,
    pub record_count: usize,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            input: None,
            record_count: 0,
            latency_ms: 0,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_input(mut self, input: impl Into<String>, record_count: usize) -> Self {
        self.input = Some(input.into());
        self.record_count = record_count;
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let command_result = match &cli.command {
        Command::Compare(args) => compare::run(args)?,
        Command::Preview(args) => preview::run(args)?,
        Command::Strategies => strategies::run()?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        input,
        record_count,
        latency_ms,
    } = command_result;

    let mut metadata = Metadata::new(input, record_count, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}
