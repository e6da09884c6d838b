//! Historical baseline and deviation scoring.

use crate::numeric::{mean, population_std, round_to};
use crate::types::Baseline;

/// Fewer samples than this yields the fallback baseline.
pub const MIN_HISTORY: usize = 3;

/// Compute mean and population std over `history`.
///
/// Short histories produce `{mean: 0, std: 1, insufficient: true}`. A zero
/// std is floored to `1.0` so [`deviation`] never divides by zero.
#[must_use]
pub fn compute_baseline(history: &[f64]) -> Baseline {
    if history.len() < MIN_HISTORY {
        return Baseline {
            mean: 0.0,
            std: 1.0,
            sample_count: history.len(),
            insufficient: true,
        };
    }

    let mean = round_to(mean(history), 2);
    let mut std = round_to(population_std(history), 2);
    if std <= 0.0 {
        std = 1.0;
    }

    Baseline {
        mean,
        std,
        sample_count: history.len(),
        insufficient: false,
    }
}

/// Z-score of `current` against the baseline, rounded to two places.
#[must_use]
pub fn deviation(current: f64, mean: f64, std: f64) -> f64 {
    let std = if std > 0.0 { std } else { 1.0 };
    round_to((current - mean) / std, 2)
}
