//! Shared configuration for the food pulse services.
//!
//! Holds the env-driven [`AppConfig`] and the YAML pulse file (delivery
//! platform profiles, tracked entities, signal feeds). Both are validated once
//! at startup so the scoring pipeline never sees an unchecked key.

pub mod app_config;
pub mod config;
pub mod error;
pub mod pulse_file;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use pulse_file::{
    load_pulse_file, parse_pulse_file, DeliveryPlatform, EntityConfig, FeedSourceConfig,
    PlatformProfile, PlatformProfiles, PulseFile, RESERVED_SOURCE_NAME,
};
