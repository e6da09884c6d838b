use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Location of the YAML pulse file (platform profiles, entities, feeds).
    pub pulse_file_path: PathBuf,
    /// Default seed for the mock signal source when a caller supplies none.
    pub mock_seed: u64,
    /// Observation window length for synthetic series.
    pub series_days: usize,
    /// Overall budget for one insight computation; remaining entities are skipped.
    pub deadline_ms: u64,
    pub source_timeout_secs: u64,
    pub source_max_retries: u32,
    pub source_backoff_ms: u64,
    /// Consecutive failures before a feed's breaker opens.
    pub breaker_threshold: u32,
    pub breaker_cooldown_secs: u64,
}
