//! Food trend pulse engine.
//!
//! Turns per-entity engagement series and social posts into ranked trend
//! insights: baseline deviation, momentum phase, cross-platform agreement,
//! a weighted confidence score, an action window, and per-delivery-platform
//! recommendations. Ingestion adapters and synthetic data live alongside so a
//! run can be driven from configuration alone.

pub mod action_window;
pub mod aggregator;
pub mod agreement;
pub mod baseline;
pub mod confidence;
pub mod error;
pub mod momentum;
pub mod orchestrator;
pub mod pipeline;
pub mod platform_bias;
pub mod records;
pub mod sources;
pub mod synthetic;
pub mod types;

mod breaker;
mod numeric;
mod retry;

pub use error::{IngestionError, PulseError};
pub use orchestrator::EntityObservation;
pub use pipeline::{compute_insights, diagnose, diagnose_batch, InsightSource, PulseContext};
pub use sources::{collect_signals, CollectedSignals, FeedSettings, SignalSource, SourceRegistry};
pub use types::{
    Insight, InsightReport, MomentumState, PlatformLeader, RiskLevel, SignalDiagnostics,
    SocialPlatform, SocialSignal, TrackedEntity, Urgency,
};
