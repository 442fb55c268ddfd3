use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Rows shown in the predictions table and line chart.
pub const DEFAULT_PREDICTION_SAMPLE: usize = 20;
/// Rows shown in the raw-data preview.
pub const DEFAULT_RAW_PREVIEW: usize = 10;

/// What a run does with a record that fails screening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRecordPolicy {
    /// Stop the run and surface the first invalid record.
    #[default]
    Abort,
    /// Exclude the record from grouping and prediction and keep going.
    Skip,
}

/// Knobs for a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Treat a missing volume as an invalid record instead of volume 0.
    pub strict_volume: bool,
    pub on_invalid: InvalidRecordPolicy,
    pub prediction_sample: usize,
    pub raw_preview: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strict_volume: false,
            on_invalid: InvalidRecordPolicy::Abort,
            prediction_sample: DEFAULT_PREDICTION_SAMPLE,
            raw_preview: DEFAULT_RAW_PREVIEW,
        }
    }
}

impl PipelineConfig {
    pub fn with_strict_volume(mut self, strict_volume: bool) -> Self {
        self.strict_volume = strict_volume;
        self
    }

    pub fn with_policy(mut self, on_invalid: InvalidRecordPolicy) -> Self {
        self.on_invalid = on_invalid;
        self
    }

    pub fn with_samples(mut self, prediction_sample: usize, raw_preview: usize) -> Self {
        self.prediction_sample = prediction_sample;
        self.raw_preview = raw_preview;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.prediction_sample == 0 {
            return Err(ValidationError::InvalidSampleSize {
                name: "prediction_sample",
            });
        }
        if self.raw_preview == 0 {
            return Err(ValidationError::InvalidSampleSize {
                name: "raw_preview",
            });
        }
        Ok(())
    }
}
