use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Source name reserved for the built-in seeded mock source.
pub const RESERVED_SOURCE_NAME: &str = "mock";

/// Merchant-facing channel a trend recommendation is tailored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPlatform {
    UberEats,
    Doordash,
    Retail,
}

impl DeliveryPlatform {
    pub const ALL: [DeliveryPlatform; 3] = [
        DeliveryPlatform::UberEats,
        DeliveryPlatform::Doordash,
        DeliveryPlatform::Retail,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryPlatform::UberEats => "uber_eats",
            DeliveryPlatform::Doordash => "doordash",
            DeliveryPlatform::Retail => "retail",
        }
    }
}

impl std::fmt::Display for DeliveryPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryPlatform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPlatform(s.to_string()))
    }
}

/// Static behavioural constants for one delivery platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformProfile {
    /// Typical hours between a social spike and demand showing up on the platform.
    pub trend_latency_hours: u32,
    pub impulse_factor: f64,
    pub promo_sensitivity: f64,
    /// How much the platform's own data can be trusted, in `[0, 1]`.
    pub data_maturity: f64,
}

/// Validated platform profile table.
///
/// Every key is a known [`DeliveryPlatform`]; construction fails otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformProfiles {
    profiles: BTreeMap<DeliveryPlatform, PlatformProfile>,
}

impl PlatformProfiles {
    /// Build from a name-keyed map, rejecting unknown names and out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatform`] for an unrecognised key and
    /// [`ConfigError::Validation`] for an empty table or an out-of-range field.
    pub fn from_named(named: BTreeMap<String, PlatformProfile>) -> Result<Self, ConfigError> {
        if named.is_empty() {
            return Err(ConfigError::Validation(
                "at least one platform profile is required".to_string(),
            ));
        }

        let mut profiles = BTreeMap::new();
        for (name, profile) in named {
            let platform: DeliveryPlatform = name.parse()?;
            validate_profile(platform, &profile)?;
            profiles.insert(platform, profile);
        }

        Ok(Self { profiles })
    }

    /// The three profiles the product launched with.
    #[must_use]
    pub fn standard() -> Self {
        let profiles = BTreeMap::from([
            (
                DeliveryPlatform::UberEats,
                PlatformProfile {
                    trend_latency_hours: 18,
                    impulse_factor: 0.7,
                    promo_sensitivity: 0.6,
                    data_maturity: 0.9,
                },
            ),
            (
                DeliveryPlatform::Doordash,
                PlatformProfile {
                    trend_latency_hours: 6,
                    impulse_factor: 0.9,
                    promo_sensitivity: 0.8,
                    data_maturity: 0.85,
                },
            ),
            (
                DeliveryPlatform::Retail,
                PlatformProfile {
                    trend_latency_hours: 72,
                    impulse_factor: 0.3,
                    promo_sensitivity: 0.4,
                    data_maturity: 0.6,
                },
            ),
        ]);
        Self { profiles }
    }

    #[must_use]
    pub fn get(&self, platform: DeliveryPlatform) -> Option<&PlatformProfile> {
        self.profiles.get(&platform)
    }

    /// Look up a profile by its configured name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatform`] when the name is not a known
    /// platform or has no profile in this table.
    pub fn lookup(&self, name: &str) -> Result<&PlatformProfile, ConfigError> {
        let platform: DeliveryPlatform = name.parse()?;
        self.get(platform)
            .ok_or_else(|| ConfigError::UnknownPlatform(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeliveryPlatform, &PlatformProfile)> {
        self.profiles.iter().map(|(k, v)| (*k, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn validate_profile(platform: DeliveryPlatform, profile: &PlatformProfile) -> Result<(), ConfigError> {
    if profile.trend_latency_hours == 0 {
        return Err(ConfigError::Validation(format!(
            "platform '{platform}' must have trend_latency_hours > 0"
        )));
    }

    for (field, value) in [
        ("impulse_factor", profile.impulse_factor),
        ("promo_sensitivity", profile.promo_sensitivity),
        ("data_maturity", profile.data_maturity),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "platform '{platform}' has {field} {value}; must be within [0, 1]"
            )));
        }
    }

    Ok(())
}

/// A food item the pulse tracks on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub holiday_soon: bool,
    /// Overrides the holiday-derived context score when set.
    #[serde(default)]
    pub context_confirmation: Option<f64>,
    /// Stored daily engagement history, oldest first.
    #[serde(default)]
    pub history: Option<Vec<f64>>,
}

/// An HTTP JSON feed of raw social signal records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSourceConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct RawPulseFile {
    platforms: BTreeMap<String, PlatformProfile>,
    #[serde(default)]
    entities: Vec<EntityConfig>,
    #[serde(default)]
    sources: Vec<FeedSourceConfig>,
}

#[derive(Debug, Clone)]
pub struct PulseFile {
    pub platforms: PlatformProfiles,
    pub entities: Vec<EntityConfig>,
    pub sources: Vec<FeedSourceConfig>,
}

/// Load and validate the pulse configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_pulse_file(path: &Path) -> Result<PulseFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PulseFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_pulse_file(&content)
}

/// Parse and validate pulse configuration from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_pulse_file(content: &str) -> Result<PulseFile, ConfigError> {
    let raw: RawPulseFile = serde_yaml::from_str(content)?;

    let platforms = PlatformProfiles::from_named(raw.platforms)?;
    validate_entities(&raw.entities)?;
    validate_sources(&raw.sources)?;

    Ok(PulseFile {
        platforms,
        entities: raw.entities,
        sources: raw.sources,
    })
}

fn validate_entities(entities: &[EntityConfig]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for entity in entities {
        if entity.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "entity name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(entity.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate entity name: '{}'",
                entity.name
            )));
        }

        if let Some(score) = entity.context_confirmation {
            if !(0.0..=1.0).contains(&score) {
                return Err(ConfigError::Validation(format!(
                    "entity '{}' has context_confirmation {score}; must be within [0, 1]",
                    entity.name
                )));
            }
        }

        if let Some(history) = &entity.history {
            if history.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ConfigError::Validation(format!(
                    "entity '{}' history must contain finite, non-negative values",
                    entity.name
                )));
            }
        }
    }

    Ok(())
}

fn validate_sources(sources: &[FeedSourceConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for source in sources {
        let name = source.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }
        if name == RESERVED_SOURCE_NAME {
            return Err(ConfigError::Validation(format!(
                "source name '{RESERVED_SOURCE_NAME}' is reserved for the built-in mock source"
            )));
        }
        if !seen.insert(name.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{name}'"
            )));
        }
        if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "source '{name}' url must start with http:// or https://"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "pulse_file_test.rs"]
mod tests;
