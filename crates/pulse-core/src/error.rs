use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read pulse file {path}: {source}")]
    PulseFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pulse file: {0}")]
    PulseFileParse(#[from] serde_yaml::Error),

    /// A platform key that is not one of the known delivery platforms.
    #[error("unknown platform: '{0}'")]
    UnknownPlatform(String),

    #[error("validation error: {0}")]
    Validation(String),
}
