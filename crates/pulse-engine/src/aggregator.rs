//! Signal batch aggregation: per-platform totals, per-entity totals, and a
//! synthetic daily series for entities that have no stored history.

use std::collections::BTreeMap;

use crate::types::{EntityTotals, SocialPlatform, SocialSignal};

/// Sum of interactions per platform.
#[must_use]
pub fn platform_totals(signals: &[SocialSignal]) -> BTreeMap<SocialPlatform, u64> {
    let mut totals = BTreeMap::new();
    for signal in signals {
        let entry = totals.entry(signal.platform).or_insert(0_u64);
        *entry = entry.saturating_add(signal.engagement.interactions());
    }
    totals
}

/// Mention count and summed interactions per food entity, keyed lowercase.
#[must_use]
pub fn entity_totals(signals: &[SocialSignal]) -> BTreeMap<String, EntityTotals> {
    let mut totals: BTreeMap<String, EntityTotals> = BTreeMap::new();
    for signal in signals {
        #[allow(clippy::cast_precision_loss)]
        let engagement = signal.engagement.interactions() as f64;
        for food in &signal.food_entities {
            let entry = totals.entry(food.to_lowercase()).or_default();
            entry.mention_count += 1;
            entry.weighted_engagement += engagement;
        }
    }
    totals
}

/// Spread the batch's total interactions into a steadily rising daily series.
///
/// The series starts at `max(total / days, 1)` and climbs by a fifth of that
/// base each day. An empty batch yields `days` zeros.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn signals_to_series(signals: &[SocialSignal], days: usize) -> Vec<f64> {
    if days == 0 {
        return Vec::new();
    }
    if signals.is_empty() {
        return vec![0.0; days];
    }

    let total: u64 = signals
        .iter()
        .map(|s| s.engagement.interactions())
        .fold(0, u64::saturating_add);
    let base = (total / days as u64).max(1);
    let step = base / 5;

    (0..days as u64)
        .map(|i| base.saturating_add(i.saturating_mul(step)) as f64)
        .collect()
}
