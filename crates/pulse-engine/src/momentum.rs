//! Velocity, acceleration, and momentum-phase classification.

use crate::numeric::{mean, round_to};
use crate::types::{MomentumReading, MomentumState};

/// Number of percent-change steps each velocity reading covers.
pub const DEFAULT_WINDOW: usize = 3;

/// Mean percent change over the trailing `window + 1` points, rounded to 3 places.
///
/// Returns `0.0` for series shorter than `window + 1` or when every
/// predecessor in the window is zero.
#[must_use]
pub fn velocity(series: &[f64], window: usize) -> f64 {
    if window == 0 || series.len() < window + 1 {
        return 0.0;
    }

    let recent = &series[series.len() - (window + 1)..];
    #[allow(clippy::float_cmp)]
    let changes: Vec<f64> = recent
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();

    if changes.is_empty() {
        return 0.0;
    }
    round_to(mean(&changes), 3)
}

/// Change in velocity between the earlier window and the trailing window.
///
/// The last `2 * window + 1` points are split without overlap: the trailing
/// `window + 1` points and the `window` points before them. Series shorter
/// than that give `0.0`.
///
/// The earlier slice is one point short of a velocity reading, so its
/// velocity is always `0.0` and the result equals the trailing velocity.
#[must_use]
pub fn acceleration(series: &[f64], window: usize) -> f64 {
    if window == 0 || series.len() < 2 * window + 1 {
        return 0.0;
    }

    let n = series.len();
    let earlier = &series[n - (2 * window + 1)..n - (window + 1)];
    let trailing = &series[n - (window + 1)..];

    round_to(velocity(trailing, window) - velocity(earlier, window), 3)
}

/// First matching rule wins.
#[must_use]
pub fn classify(velocity: f64, acceleration: f64) -> MomentumState {
    if velocity > 0.2 && acceleration > 0.0 {
        MomentumState::Emerging
    } else if velocity > 0.2 && acceleration.abs() <= 0.05 {
        MomentumState::Peaking
    } else if velocity > 0.1 && acceleration < 0.0 {
        MomentumState::Fatigued
    } else {
        MomentumState::Flat
    }
}

/// Velocity, acceleration, and phase for a series using [`DEFAULT_WINDOW`].
#[must_use]
pub fn read_momentum(series: &[f64]) -> MomentumReading {
    let velocity = velocity(series, DEFAULT_WINDOW);
    let acceleration = acceleration(series, DEFAULT_WINDOW);
    MomentumReading {
        velocity,
        acceleration,
        state: classify(velocity, acceleration),
    }
}
