//! Weighted confidence model, risk tiers, and the plain-language explanation.

use crate::error::PulseError;
use crate::numeric::round_to;
use crate::types::{ConfidenceResult, MomentumState, PlatformLeader, RiskLevel};

const DEVIATION_WEIGHT: f64 = 0.4;
const MOMENTUM_WEIGHT: f64 = 0.3;
const AGREEMENT_WEIGHT: f64 = 0.2;
const CONTEXT_WEIGHT: f64 = 0.1;

/// Deviation at which the deviation component saturates.
const DEVIATION_SCALE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    pub deviation_score: f64,
    pub momentum_state: MomentumState,
    /// Cross-platform agreement in `[0, 1]`.
    pub signal_agreement: f64,
    /// External context support in `[0, 1]`.
    pub context_confirmation: f64,
    pub platform_leader: Option<PlatformLeader>,
}

impl ConfidenceInputs {
    /// Inputs with full agreement, no context support, and no leader.
    #[must_use]
    pub fn new(deviation_score: f64, momentum_state: MomentumState) -> Self {
        Self {
            deviation_score,
            momentum_state,
            signal_agreement: 1.0,
            context_confirmation: 0.0,
            platform_leader: None,
        }
    }
}

fn momentum_weight(state: MomentumState) -> f64 {
    match state {
        MomentumState::Emerging => 1.0,
        MomentumState::Peaking => 0.7,
        MomentumState::Fatigued => 0.3,
        MomentumState::Flat => 0.1,
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), PulseError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PulseError::Validation {
            field: field.to_string(),
            reason: format!("must be within [0, 1], got {value}"),
        })
    }
}

/// Risk tier for a confidence score.
#[must_use]
pub fn risk_level(confidence: f64) -> RiskLevel {
    if confidence >= 0.75 {
        RiskLevel::Low
    } else if confidence >= 0.45 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Combine deviation, momentum, agreement, and context into one score.
///
/// # Errors
///
/// Returns [`PulseError::Validation`] when `signal_agreement` or
/// `context_confirmation` falls outside `[0, 1]`, or when the deviation
/// score is not finite. Out-of-range scores are never clamped.
pub fn score_confidence(inputs: &ConfidenceInputs) -> Result<ConfidenceResult, PulseError> {
    check_unit_interval("signal_agreement", inputs.signal_agreement)?;
    check_unit_interval("context_confirmation", inputs.context_confirmation)?;
    if !inputs.deviation_score.is_finite() {
        return Err(PulseError::Validation {
            field: "deviation_score".to_string(),
            reason: format!("must be finite, got {}", inputs.deviation_score),
        });
    }

    let deviation_component = (inputs.deviation_score / DEVIATION_SCALE).clamp(0.0, 1.0);
    let raw = DEVIATION_WEIGHT * deviation_component
        + MOMENTUM_WEIGHT * momentum_weight(inputs.momentum_state)
        + AGREEMENT_WEIGHT * inputs.signal_agreement
        + CONTEXT_WEIGHT * inputs.context_confirmation;
    let score = round_to(raw.min(1.0), 3);
    let risk = risk_level(score);

    Ok(ConfidenceResult {
        score,
        risk_level: risk,
        explanation: explain(inputs, score, risk),
    })
}

fn explain(inputs: &ConfidenceInputs, score: f64, risk: RiskLevel) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(6);

    let deviation = if inputs.deviation_score > 2.0 {
        "Buzz is significantly above normal baseline"
    } else if inputs.deviation_score > 1.0 {
        "Buzz is moderately above baseline"
    } else {
        "Buzz is close to normal levels"
    };
    parts.push(deviation.to_string());

    let momentum = match inputs.momentum_state {
        MomentumState::Emerging => "Momentum is building rapidly (early trend phase)",
        MomentumState::Peaking => "Trend is near peak attention",
        MomentumState::Fatigued => "Momentum is slowing down",
        MomentumState::Flat => "Trend momentum is flat",
    };
    parts.push(momentum.to_string());

    let agreement = if inputs.signal_agreement >= 0.75 {
        "Signals strongly align across platforms"
    } else if inputs.signal_agreement >= 0.55 {
        "Signals are moderately aligned across platforms"
    } else {
        "Signals diverge across platforms, reducing confidence"
    };
    parts.push(agreement.to_string());

    match inputs.platform_leader {
        None | Some(PlatformLeader::Unknown) => {}
        Some(PlatformLeader::Both) => parts.push("Momentum is similar across platforms".to_string()),
        Some(PlatformLeader::Platform(platform)) => {
            parts.push(format!("{} is leading this trend", platform.display_name()));
        }
    }

    let context = if inputs.context_confirmation > 0.5 {
        "Context signals support this trend (e.g., holiday/event)"
    } else {
        "Context signals provide limited support for this trend"
    };
    parts.push(context.to_string());

    parts.push(format!("Overall confidence: {score} (Risk: {risk})"));

    let mut text = parts.join(". ");
    text.push('.');
    text
}
