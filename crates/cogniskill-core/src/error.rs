//! Pipeline error types.
//!
//! Every failure here aborts the current run. The variants are grouped the
//! same way the CLI reports them: configuration problems are caught before any
//! sampling happens, data problems surface in the analysis stages.

use thiserror::Error;

/// Errors raised by the generation and analysis stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested record count was zero.
    #[error("invalid record count: {0} (must be at least 1)")]
    InvalidRecordCount(usize),

    /// Class weights are negative, empty, or do not sum to 1.
    #[error("invalid class weights: {0}")]
    InvalidWeights(String),

    /// Any other configuration value outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A generated record violated one of its bounds.
    #[error("invalid record {student_id}: {reason}")]
    InvalidRecord { student_id: String, reason: String },

    /// Not enough records for the requested stage.
    #[error("insufficient data for {stage}: {detail}")]
    InsufficientData { stage: &'static str, detail: String },

    /// The regression normal equations have no unique solution.
    #[error("singular regression system: {0}")]
    SingularSystem(String),
}

impl PipelineError {
    /// Returns `true` for errors caused by configuration rather than data.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidRecordCount(_)
                | PipelineError::InvalidWeights(_)
                | PipelineError::InvalidConfig(_)
        )
    }

    pub(crate) fn insufficient(stage: &'static str, detail: impl Into<String>) -> Self {
        PipelineError::InsufficientData {
            stage,
            detail: detail.into(),
        }
    }
}
