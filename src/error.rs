// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures surfaced by the collector and the processor.
///
/// `Parse` is normally absorbed per artifact by the processor; it is still a
/// variant so stores and callers can report it with the same type.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data source '{0}' not configured")]
    Configuration(String),

    #[error("failed to fetch data from {source_name}: {reason}")]
    Fetch { source_name: String, reason: String },

    #[error("no data found for source {0}")]
    NotFound(String),

    #[error("failed to parse artifact {key}: {reason}")]
    Parse { key: String, reason: String },

    #[error("storage error: {0}")]
    Storage(String),
}

impl PipelineError {
    pub fn fetch(source_name: &str, reason: impl Into<String>) -> Self {
        Self::Fetch {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly label, used for metrics and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Fetch { .. } => "fetch",
            Self::NotFound(_) => "not_found",
            Self::Parse { .. } => "parse",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
