use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("PULSE_ENV", "development")).ok_or_else(|| {
        ConfigError::InvalidEnvVar {
            var: "PULSE_ENV".to_string(),
            reason: "expected one of: development, test, production".to_string(),
        }
    })?;

    let bind_addr: SocketAddr =
        parse_as("PULSE_BIND_ADDR", &or_default("PULSE_BIND_ADDR", "0.0.0.0:8000"))?;
    let log_level = or_default("PULSE_LOG_LEVEL", "info");
    let pulse_file_path = PathBuf::from(or_default("PULSE_CONFIG_PATH", "./config/pulse.yaml"));

    let mock_seed: u64 = parse_as("PULSE_MOCK_SEED", &or_default("PULSE_MOCK_SEED", "42"))?;
    let series_days: usize =
        parse_as("PULSE_SERIES_DAYS", &or_default("PULSE_SERIES_DAYS", "14"))?;
    let deadline_ms: u64 =
        parse_as("PULSE_DEADLINE_MS", &or_default("PULSE_DEADLINE_MS", "2000"))?;
    let source_timeout_secs: u64 = parse_as(
        "PULSE_SOURCE_TIMEOUT_SECS",
        &or_default("PULSE_SOURCE_TIMEOUT_SECS", "10"),
    )?;
    let source_max_retries: u32 = parse_as(
        "PULSE_SOURCE_MAX_RETRIES",
        &or_default("PULSE_SOURCE_MAX_RETRIES", "2"),
    )?;
    let source_backoff_ms: u64 = parse_as(
        "PULSE_SOURCE_BACKOFF_MS",
        &or_default("PULSE_SOURCE_BACKOFF_MS", "250"),
    )?;
    let breaker_threshold: u32 = parse_as(
        "PULSE_BREAKER_THRESHOLD",
        &or_default("PULSE_BREAKER_THRESHOLD", "3"),
    )?;
    let breaker_cooldown_secs: u64 = parse_as(
        "PULSE_BREAKER_COOLDOWN_SECS",
        &or_default("PULSE_BREAKER_COOLDOWN_SECS", "60"),
    )?;

    if series_days < 2 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PULSE_SERIES_DAYS".to_string(),
            reason: format!("must be at least 2, got {series_days}"),
        });
    }

    if breaker_threshold == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PULSE_BREAKER_THRESHOLD".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        pulse_file_path,
        mock_seed,
        series_days,
        deadline_ms,
        source_timeout_secs,
        source_max_retries,
        source_backoff_ms,
        breaker_threshold,
        breaker_cooldown_secs,
    })
}

/// Parse a raw env value, mapping failures to [`ConfigError::InvalidEnvVar`].
fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// Returns `None` for anything that is not an exact match.
fn parse_environment(s: &str) -> Option<Environment> {
    match s {
        "development" => Some(Environment::Development),
        "test" => Some(Environment::Test),
        "production" => Some(Environment::Production),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
