use pulse_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PulseError {
    /// Static configuration is inconsistent (e.g. an unknown platform key).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied input violates its documented domain.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown insight source '{0}'; expected 'mock' or 'social'")]
    UnknownSource(String),

    #[error("ingestion error: {0}")]
    Ingestion(#[from] IngestionError),
}

impl From<ConfigError> for PulseError {
    fn from(err: ConfigError) -> Self {
        PulseError::Configuration(err.to_string())
    }
}

/// Failures raised by a signal source while fetching raw records.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("source '{source_name}' returned HTTP {status}")]
    UnexpectedStatus { source_name: String, status: u16 },

    #[error("source '{source_name}' returned an undecodable payload: {reason}")]
    Decode { source_name: String, reason: String },

    #[error("circuit open for source '{source_name}'")]
    CircuitOpen { source_name: String },

    #[error("invalid source configuration: {0}")]
    InvalidSource(String),
}
