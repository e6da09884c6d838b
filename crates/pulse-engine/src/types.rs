use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use pulse_core::{DeliveryPlatform, EntityConfig};
use serde::{Deserialize, Serialize, Serializer};

/// Default observation window for daily engagement series.
pub const DEFAULT_SERIES_DAYS: usize = 14;

/// Social network a raw signal was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Tiktok,
    Instagram,
    Youtube,
    X,
}

impl SocialPlatform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Tiktok => "tiktok",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::X => "x",
        }
    }

    /// Human-facing spelling used in explanations.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            SocialPlatform::Tiktok => "TikTok",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Youtube => "YouTube",
            SocialPlatform::X => "X",
        }
    }
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub views: u64,
}

impl Engagement {
    /// Likes + comments + shares. Views are passive and excluded.
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
    }
}

/// One post-level observation. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSignal {
    pub platform: SocialPlatform,
    pub post_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub hashtags: BTreeSet<String>,
    pub food_entities: Vec<String>,
    pub engagement: Engagement,
    pub creator_followers: u64,
    #[serde(default)]
    pub geo: Option<String>,
}

impl SocialSignal {
    /// Case-insensitive match against the extracted food entities.
    #[must_use]
    pub fn mentions(&self, entity: &str) -> bool {
        self.food_entities
            .iter()
            .any(|food| food.eq_ignore_ascii_case(entity))
    }
}

/// Signals returned by one source fetch, plus how many raw records were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalBatch {
    pub signals: Vec<SocialSignal>,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumState {
    Emerging,
    Peaking,
    Fatigued,
    Flat,
}

impl MomentumState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MomentumState::Emerging => "EMERGING",
            MomentumState::Peaking => "PEAKING",
            MomentumState::Fatigued => "FATIGUED",
            MomentumState::Flat => "FLAT",
        }
    }
}

impl std::fmt::Display for MomentumState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// How soon a merchant has to act on the whole trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Now,
    Soon,
    Normal,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Now => write!(f, "NOW"),
            Urgency::Soon => write!(f, "SOON"),
            Urgency::Normal => write!(f, "NORMAL"),
        }
    }
}

/// Urgency of a single delivery-platform recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiasUrgency {
    High,
    Medium,
    Low,
}

/// Which social platform dominates a trend's engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformLeader {
    /// No platform data at all.
    Unknown,
    /// The top two platforms are within tolerance of each other.
    Both,
    Platform(SocialPlatform),
}

impl PlatformLeader {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformLeader::Unknown => "unknown",
            PlatformLeader::Both => "both",
            PlatformLeader::Platform(p) => p.as_str(),
        }
    }
}

impl std::fmt::Display for PlatformLeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlatformLeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Historical mean/std used to normalise the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baseline {
    pub mean: f64,
    /// Never zero; floored to 1.0.
    pub std: f64,
    pub sample_count: usize,
    /// Set when fewer than three samples were available.
    pub insufficient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumReading {
    pub velocity: f64,
    pub acceleration: f64,
    pub state: MomentumState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceResult {
    pub score: f64,
    pub risk_level: RiskLevel,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionWindow {
    pub hours: u32,
    pub urgency: Urgency,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformBias {
    pub adjusted_phase: MomentumState,
    pub adjusted_confidence: f64,
    pub urgency: BiasUrgency,
    pub recommended_action: String,
}

/// The per-entity record delivered to merchants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub entity: String,
    pub category: String,
    pub series: Vec<f64>,
    pub baseline: Baseline,
    pub current_value: f64,
    pub deviation_score: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub momentum_state: MomentumState,
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub action_hint: String,
    pub action_window_hours: u32,
    pub urgency: Urgency,
    pub window_explanation: String,
    pub platform_bias: BTreeMap<DeliveryPlatform, PlatformBias>,
}

/// A food item to score, as supplied by configuration or the mock catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    pub name: String,
    pub category: String,
    pub holiday_soon: bool,
    /// Explicit context score from the holiday/context collaborator.
    pub context_confirmation: Option<f64>,
    /// Stored daily history, oldest first; the last sample is the current value.
    pub history: Option<Vec<f64>>,
}

impl TrackedEntity {
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            holiday_soon: false,
            context_confirmation: None,
            history: None,
        }
    }
}

impl From<EntityConfig> for TrackedEntity {
    fn from(config: EntityConfig) -> Self {
        Self {
            name: config.name,
            category: config.category,
            holiday_soon: config.holiday_soon,
            context_confirmation: config.context_confirmation,
            history: config.history,
        }
    }
}

/// Per-entity totals from the signal batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EntityTotals {
    pub mention_count: usize,
    pub weighted_engagement: f64,
}

/// Intermediate aggregates for one signal batch, exposed for observability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDiagnostics {
    pub signal_count: usize,
    pub rejected_records: usize,
    pub platform_totals: BTreeMap<SocialPlatform, u64>,
    pub platform_momentum: BTreeMap<SocialPlatform, f64>,
    pub agreement: f64,
    pub leader: PlatformLeader,
    pub entity_totals: BTreeMap<String, EntityTotals>,
    pub warnings: Vec<String>,
}

/// Output of one pulse computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    /// Entities not scored because the deadline passed.
    pub skipped: Vec<String>,
    /// Degraded-data notices, e.g. a source that could not be reached.
    pub warnings: Vec<String>,
    pub rejected_records: usize,
}

impl InsightReport {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.skipped.is_empty() || !self.warnings.is_empty() || self.rejected_records > 0
    }
}
