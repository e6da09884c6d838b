//! Per-delivery-platform re-mapping of phase and confidence.

use std::collections::BTreeMap;

use pulse_core::{DeliveryPlatform, PlatformProfile, PlatformProfiles};

use crate::error::PulseError;
use crate::numeric::round_to;
use crate::types::{BiasUrgency, MomentumState, PlatformBias};

/// Adjust one raw reading for a single platform profile.
#[must_use]
pub fn adjust(
    profile: &PlatformProfile,
    confidence: f64,
    state: MomentumState,
    velocity: f64,
) -> PlatformBias {
    let adjusted_phase = if velocity > 0.6 && profile.trend_latency_hours <= 8 {
        MomentumState::Peaking
    } else if velocity < 0.2 {
        MomentumState::Fatigued
    } else {
        state
    };

    let urgency = match adjusted_phase {
        MomentumState::Peaking => BiasUrgency::High,
        MomentumState::Emerging => BiasUrgency::Medium,
        MomentumState::Fatigued | MomentumState::Flat => BiasUrgency::Low,
    };

    let recommended_action = match adjusted_phase {
        MomentumState::Peaking => "launch promotion immediately",
        MomentumState::Emerging => "prepare promo creatives",
        MomentumState::Flat => "monitor trend",
        MomentumState::Fatigued => "avoid new campaigns",
    };

    PlatformBias {
        adjusted_phase,
        adjusted_confidence: round_to(confidence * profile.data_maturity, 2),
        urgency,
        recommended_action: recommended_action.to_string(),
    }
}

/// Adjust for every configured platform.
#[must_use]
pub fn adjust_all(
    profiles: &PlatformProfiles,
    confidence: f64,
    state: MomentumState,
    velocity: f64,
) -> BTreeMap<DeliveryPlatform, PlatformBias> {
    profiles
        .iter()
        .map(|(platform, profile)| (platform, adjust(profile, confidence, state, velocity)))
        .collect()
}

/// Adjust for a platform looked up by name.
///
/// # Errors
///
/// Returns [`PulseError::Configuration`] when `platform` is not a configured
/// delivery platform.
pub fn adjust_for_named(
    profiles: &PlatformProfiles,
    platform: &str,
    confidence: f64,
    state: MomentumState,
    velocity: f64,
) -> Result<PlatformBias, PulseError> {
    let profile = profiles.lookup(platform)?;
    Ok(adjust(profile, confidence, state, velocity))
}
