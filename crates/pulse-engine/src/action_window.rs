//! Remaining-opportunity estimate for a trend.

use crate::types::{ActionWindow, MomentumState, Urgency};

/// Lower bound on any estimate.
pub const MIN_WINDOW_HOURS: u32 = 6;

fn base_hours(state: MomentumState) -> f64 {
    match state {
        MomentumState::Emerging => 72.0,
        MomentumState::Peaking => 24.0,
        MomentumState::Fatigued => 8.0,
        MomentumState::Flat => 48.0,
    }
}

/// Urgency tier for a window length.
#[must_use]
pub fn urgency_for(hours: u32) -> Urgency {
    if hours <= 18 {
        Urgency::Now
    } else if hours <= 48 {
        Urgency::Soon
    } else {
        Urgency::Normal
    }
}

/// Estimate how many hours a merchant has left to act.
///
/// `velocity` does not move the estimate; phase and acceleration already
/// capture it.
#[must_use]
pub fn estimate_action_window(
    state: MomentumState,
    _velocity: f64,
    acceleration: f64,
    deviation_score: f64,
) -> ActionWindow {
    let mut hours = base_hours(state);

    if deviation_score > 3.0 {
        hours *= 0.7;
    } else if deviation_score < 1.0 {
        hours *= 1.2;
    }

    if acceleration < 0.0 {
        hours *= 0.6;
    } else if acceleration > 0.2 {
        hours *= 0.8;
    }

    // base tops out at 72 * 1.2, well inside u32
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let hours = (hours.trunc() as u32).max(MIN_WINDOW_HOURS);

    ActionWindow {
        hours,
        urgency: urgency_for(hours),
        explanation: explain(state, deviation_score, acceleration, hours),
    }
}

fn explain(state: MomentumState, deviation_score: f64, acceleration: f64, hours: u32) -> String {
    let phase = match state {
        MomentumState::Emerging => "Trend is in early growth phase",
        MomentumState::Peaking => "Trend is near peak attention",
        MomentumState::Fatigued => "Trend momentum is declining",
        MomentumState::Flat => "Trend momentum is stable",
    };

    let mut parts = vec![phase.to_string()];
    if deviation_score > 3.0 {
        parts.push("High spike suggests short-lived hype cycle".to_string());
    }
    if acceleration < 0.0 {
        parts.push("Engagement growth is slowing".to_string());
    }
    parts.push(format!("Estimated effective window: ~{hours} hours"));

    let mut text = parts.join(". ");
    text.push('.');
    text
}
