//! Per-entity sequencing of the scoring stages into [`Insight`] records.

use std::time::Instant;

use pulse_core::PlatformProfiles;

use crate::action_window::estimate_action_window;
use crate::agreement::{agreement, leader, platform_momentum};
use crate::baseline::{compute_baseline, deviation};
use crate::confidence::{score_confidence, ConfidenceInputs};
use crate::error::PulseError;
use crate::momentum::read_momentum;
use crate::platform_bias::adjust_all;
use crate::types::{Insight, InsightReport, MomentumState, SocialSignal, TrackedEntity};

/// Context support assumed when a holiday or event is imminent.
pub const HOLIDAY_CONTEXT: f64 = 0.8;
/// Context support assumed otherwise.
pub const BASELINE_CONTEXT: f64 = 0.2;

/// Everything the scoring stages need for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityObservation {
    pub entity: TrackedEntity,
    /// Daily engagement, oldest first. The last sample is the current value.
    pub series: Vec<f64>,
    /// Posts mentioning the entity, used for cross-platform agreement.
    pub signals: Vec<SocialSignal>,
}

/// Explicit override if present, else derived from the holiday flag.
#[must_use]
pub fn context_confirmation(entity: &TrackedEntity) -> f64 {
    entity.context_confirmation.unwrap_or(if entity.holiday_soon {
        HOLIDAY_CONTEXT
    } else {
        BASELINE_CONTEXT
    })
}

/// Coarse merchant-facing hint from confidence and phase.
#[must_use]
pub fn action_hint(confidence: f64, state: MomentumState) -> &'static str {
    match state {
        MomentumState::Emerging if confidence > 0.8 => "launch promotion (early window)",
        MomentumState::Peaking if confidence > 0.6 => "boost visibility (short window)",
        MomentumState::Fatigued => "avoid heavy spend",
        _ => "monitor",
    }
}

/// Run every stage for one entity.
///
/// # Errors
///
/// Returns [`PulseError::Validation`] when the entity's context score is
/// outside `[0, 1]`.
pub fn score_entity(
    observation: &EntityObservation,
    profiles: &PlatformProfiles,
) -> Result<Insight, PulseError> {
    let (history, current) = match observation.series.split_last() {
        Some((last, rest)) => (rest, *last),
        None => (&[][..], 0.0),
    };

    let baseline = compute_baseline(history);
    let deviation_score = deviation(current, baseline.mean, baseline.std);
    let momentum = read_momentum(&observation.series);

    let by_platform = platform_momentum(&observation.signals);
    let confidence = score_confidence(&ConfidenceInputs {
        deviation_score,
        momentum_state: momentum.state,
        signal_agreement: agreement(&by_platform),
        context_confirmation: context_confirmation(&observation.entity),
        platform_leader: Some(leader(&by_platform)),
    })?;

    let window = estimate_action_window(
        momentum.state,
        momentum.velocity,
        momentum.acceleration,
        deviation_score,
    );
    let platform_bias = adjust_all(profiles, confidence.score, momentum.state, momentum.velocity);

    Ok(Insight {
        entity: observation.entity.name.clone(),
        category: observation.entity.category.clone(),
        series: observation.series.clone(),
        baseline,
        current_value: current,
        deviation_score,
        velocity: momentum.velocity,
        acceleration: momentum.acceleration,
        momentum_state: momentum.state,
        action_hint: action_hint(confidence.score, momentum.state).to_string(),
        confidence_score: confidence.score,
        risk_level: confidence.risk_level,
        explanation: confidence.explanation,
        action_window_hours: window.hours,
        urgency: window.urgency,
        window_explanation: window.explanation,
        platform_bias,
    })
}

/// Score observations in the order supplied.
///
/// Once `deadline` passes the remaining entities are listed in
/// [`InsightReport::skipped`] instead of being scored.
///
/// # Errors
///
/// Propagates the first [`PulseError`] raised while scoring an entity.
pub fn run(
    observations: &[EntityObservation],
    profiles: &PlatformProfiles,
    deadline: Option<Instant>,
) -> Result<InsightReport, PulseError> {
    let mut report = InsightReport::default();

    for (index, observation) in observations.iter().enumerate() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            report.skipped = observations[index..]
                .iter()
                .map(|o| o.entity.name.clone())
                .collect();
            tracing::warn!(
                skipped = report.skipped.len(),
                "pulse deadline exceeded, returning partial results"
            );
            break;
        }

        let insight = score_entity(observation, profiles)?;
        tracing::debug!(
            entity = %insight.entity,
            state = %insight.momentum_state,
            confidence = insight.confidence_score,
            "scored entity"
        );
        report.insights.push(insight);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{DateTime, Utc};
    use pulse_core::DeliveryPlatform;

    use super::*;
    use crate::types::{Engagement, RiskLevel, SocialPlatform, Urgency};

    const RISING: [f64; 7] = [10.0, 12.0, 15.0, 21.0, 30.0, 45.0, 70.0];

    fn signal(platform: SocialPlatform, likes: u64) -> SocialSignal {
        SocialSignal {
            platform,
            post_id: format!("{platform}-1"),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            text: None,
            hashtags: BTreeSet::new(),
            food_entities: vec!["nachos".to_string()],
            engagement: Engagement {
                likes,
                ..Engagement::default()
            },
            creator_followers: 10,
            geo: None,
        }
    }

    fn observation(name: &str, series: &[f64]) -> EntityObservation {
        EntityObservation {
            entity: TrackedEntity::new(name, "Snacks"),
            series: series.to_vec(),
            signals: vec![
                signal(SocialPlatform::Tiktok, 1000),
                signal(SocialPlatform::Instagram, 950),
            ],
        }
    }

    #[test]
    fn action_hint_rules() {
        assert_eq!(
            action_hint(0.81, MomentumState::Emerging),
            "launch promotion (early window)"
        );
        assert_eq!(action_hint(0.8, MomentumState::Emerging), "monitor");
        assert_eq!(
            action_hint(0.61, MomentumState::Peaking),
            "boost visibility (short window)"
        );
        assert_eq!(action_hint(0.6, MomentumState::Peaking), "monitor");
        assert_eq!(action_hint(0.99, MomentumState::Fatigued), "avoid heavy spend");
        assert_eq!(action_hint(0.99, MomentumState::Flat), "monitor");
    }

    #[test]
    fn context_defaults_follow_holiday_flag() {
        let mut entity = TrackedEntity::new("nachos", "Snacks");
        assert_eq!(context_confirmation(&entity), BASELINE_CONTEXT);
        entity.holiday_soon = true;
        assert_eq!(context_confirmation(&entity), HOLIDAY_CONTEXT);
        entity.context_confirmation = Some(0.1);
        assert_eq!(context_confirmation(&entity), 0.1);
    }

    #[test]
    fn rising_series_scores_as_emerging_with_full_record() {
        let insight = score_entity(&observation("nachos", &RISING), &PlatformProfiles::standard())
            .unwrap();

        // history [10..45]: mean 22.17, std 12.16; current 70
        assert!((insight.baseline.mean - 22.17).abs() < 1e-9);
        assert!((insight.baseline.std - 12.16).abs() < 1e-9);
        assert_eq!(insight.current_value, 70.0);
        assert!((insight.deviation_score - 3.93).abs() < 1e-9);
        assert_eq!(insight.momentum_state, MomentumState::Emerging);

        // 0.4 + 0.3 + 0.2 * 0.85 + 0.1 * 0.2 = 0.89
        assert!((insight.confidence_score - 0.89).abs() < 1e-9);
        assert_eq!(insight.risk_level, RiskLevel::Low);
        assert!(insight.explanation.contains("Momentum is similar across platforms"));
        assert_eq!(insight.action_hint, "launch promotion (early window)");

        // 72 * 0.7 * 0.8 = 40.32
        assert_eq!(insight.action_window_hours, 40);
        assert_eq!(insight.urgency, Urgency::Soon);

        assert_eq!(insight.platform_bias.len(), 3);
        assert!(insight.platform_bias.contains_key(&DeliveryPlatform::Retail));
    }

    #[test]
    fn empty_series_falls_back_without_error() {
        let insight =
            score_entity(&observation("ghost", &[]), &PlatformProfiles::standard()).unwrap();
        assert_eq!(insight.current_value, 0.0);
        assert!(insight.baseline.insufficient);
        assert_eq!(insight.momentum_state, MomentumState::Flat);
    }

    #[test]
    fn out_of_range_context_is_surfaced() {
        let mut obs = observation("nachos", &RISING);
        obs.entity.context_confirmation = Some(1.5);
        let result = score_entity(&obs, &PlatformProfiles::standard());
        assert!(matches!(result, Err(PulseError::Validation { .. })));
    }

    #[test]
    fn run_preserves_input_order() {
        let observations = vec![
            observation("zucchini", &RISING),
            observation("apple", &[5.0; 10]),
            observation("mango", &RISING),
        ];
        let report = run(&observations, &PlatformProfiles::standard(), None).unwrap();
        let names: Vec<&str> = report.insights.iter().map(|i| i.entity.as_str()).collect();
        assert_eq!(names, vec!["zucchini", "apple", "mango"]);
        assert!(report.skipped.is_empty());
        assert!(!report.is_degraded());
    }

    #[test]
    fn expired_deadline_skips_remaining_entities() {
        let observations = vec![observation("a", &RISING), observation("b", &RISING)];
        let report = run(
            &observations,
            &PlatformProfiles::standard(),
            Some(Instant::now()),
        )
        .unwrap();
        assert!(report.insights.is_empty());
        assert_eq!(report.skipped, vec!["a".to_string(), "b".to_string()]);
        assert!(report.is_degraded());
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let observations = vec![observation("nachos", &RISING)];
        let profiles = PlatformProfiles::standard();
        assert_eq!(
            run(&observations, &profiles, None).unwrap(),
            run(&observations, &profiles, None).unwrap()
        );
    }
}
