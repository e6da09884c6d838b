//! Seeded synthetic data: mock engagement series, the mock trend catalogue,
//! and dummy social posts.
//!
//! Every generator takes the RNG by `&mut` so callers decide the seed and
//! identical seeds reproduce identical output.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

use crate::types::{Engagement, SocialPlatform, SocialSignal, TrackedEntity};

/// Starting level of a mock series.
pub const MOCK_BASE_LEVEL: i64 = 100;

/// Reference "now" for dummy posts (2026-02-15T10:00:00Z).
pub const MOCK_EPOCH_SECS: i64 = 1_771_149_600;

const DUMMY_PLATFORMS: [SocialPlatform; 3] = [
    SocialPlatform::Tiktok,
    SocialPlatform::Instagram,
    SocialPlatform::Youtube,
];

/// A catalogue entry for mock mode.
#[derive(Debug, Clone, PartialEq)]
pub struct MockTrend {
    pub entity: TrackedEntity,
    /// Whether the generated series ends with a late surge.
    pub spike: bool,
}

/// Random-walk series starting near `base`. With `spike`, the last three
/// days each add a 20 to 60 point surge that carries forward.
#[allow(clippy::cast_precision_loss)]
pub fn generate_mock_series<R: Rng + ?Sized>(
    rng: &mut R,
    days: usize,
    base: i64,
    spike: bool,
) -> Vec<f64> {
    let mut level = base;
    let mut series = Vec::with_capacity(days);

    for i in 0..days {
        level = (level + rng.random_range(-5..=8)).max(1);
        if spike && i + 4 > days {
            level += rng.random_range(20..=60);
        }
        series.push(level as f64);
    }

    series
}

/// The fixed mock catalogue: two spiking trends and one flat one.
#[must_use]
pub fn mock_trends() -> Vec<MockTrend> {
    let mut chip_day = TrackedEntity::new("National Potato Chip Day", "Snacks");
    chip_day.holiday_soon = true;

    vec![
        MockTrend {
            entity: chip_day,
            spike: true,
        },
        MockTrend {
            entity: TrackedEntity::new("Avocado Toast", "Breakfast"),
            spike: true,
        },
        MockTrend {
            entity: TrackedEntity::new("Bubble Tea", "Beverages"),
            spike: false,
        },
    ]
}

/// One dummy post per platform mentioning `food`.
pub fn dummy_signals<R: Rng + ?Sized>(rng: &mut R, food: &str) -> Vec<SocialSignal> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(MOCK_EPOCH_SECS);
    let tag = food.to_lowercase().replace(' ', "");

    DUMMY_PLATFORMS
        .iter()
        .map(|platform| {
            let likes = rng.random_range(300..=5000);
            let comments = rng.random_range(20..=300);
            let shares = rng.random_range(5..=80);
            let views = rng.random_range(1000..=50_000);
            let hours_ago = rng.random_range(1..=48);
            let post_number: u32 = rng.random_range(1..=10_000);

            SocialSignal {
                platform: *platform,
                post_id: format!("{platform}_{tag}_{post_number}"),
                timestamp: epoch - TimeDelta::hours(hours_ago),
                text: Some(format!("Trending {food} content")),
                hashtags: BTreeSet::from([format!("#{tag}"), "#foodtrend".to_string()]),
                food_entities: vec![food.to_string()],
                engagement: Engagement {
                    likes,
                    comments,
                    shares,
                    views,
                },
                creator_followers: rng.random_range(5000..=150_000),
                geo: Some("US".to_string()),
            }
        })
        .collect()
}
