//! Cross-platform agreement and leader detection.

use std::collections::BTreeMap;

use crate::aggregator::platform_totals;
use crate::numeric::round_to;
use crate::types::{PlatformLeader, SocialPlatform, SocialSignal};

/// Agreement reported when fewer than two platforms carry signals.
pub const SINGLE_PLATFORM_AGREEMENT: f64 = 0.5;

/// Top-two momentum gap under which the leader is reported as "both".
pub const LEADER_TOLERANCE: f64 = 0.1;

/// Per-platform interactions normalised by the busiest platform, rounded to 2 places.
#[must_use]
pub fn platform_momentum(signals: &[SocialSignal]) -> BTreeMap<SocialPlatform, f64> {
    normalize(&platform_totals(signals))
}

/// Normalise raw totals into `(0, 1]`. An all-zero table maps to zeros.
#[must_use]
pub fn normalize(totals: &BTreeMap<SocialPlatform, u64>) -> BTreeMap<SocialPlatform, f64> {
    let max = totals.values().copied().max().unwrap_or(0).max(1);
    #[allow(clippy::cast_precision_loss)]
    let max = max as f64;

    totals
        .iter()
        .map(|(platform, total)| {
            #[allow(clippy::cast_precision_loss)]
            let share = *total as f64 / max;
            (*platform, round_to(share, 2))
        })
        .collect()
}

/// Banded spread of normalised momentum across platforms.
#[must_use]
pub fn agreement(momentum: &BTreeMap<SocialPlatform, f64>) -> f64 {
    if momentum.len() <= 1 {
        return SINGLE_PLATFORM_AGREEMENT;
    }

    let max = momentum.values().copied().fold(f64::MIN, f64::max);
    let min = momentum.values().copied().fold(f64::MAX, f64::min);
    let diff = max - min;

    if diff < 0.2 {
        0.85
    } else if diff < 0.5 {
        0.65
    } else {
        0.4
    }
}

/// The platform whose momentum dominates, `Both` on a near tie.
#[must_use]
pub fn leader(momentum: &BTreeMap<SocialPlatform, f64>) -> PlatformLeader {
    let mut ranked: Vec<(SocialPlatform, f64)> =
        momentum.iter().map(|(p, m)| (*p, *m)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    match ranked.as_slice() {
        [] => PlatformLeader::Unknown,
        [(only, _)] => PlatformLeader::Platform(*only),
        [(top, top_m), (_, second_m), ..] => {
            if top_m - second_m < LEADER_TOLERANCE {
                PlatformLeader::Both
            } else {
                PlatformLeader::Platform(*top)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::types::Engagement;

    fn signal(platform: SocialPlatform, post_id: &str, likes: u64) -> SocialSignal {
        SocialSignal {
            platform,
            post_id: post_id.to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            text: None,
            hashtags: std::collections::BTreeSet::new(),
            food_entities: vec!["nachos".to_string()],
            engagement: Engagement {
                likes,
                comments: 0,
                shares: 0,
                views: 999,
            },
            creator_followers: 100,
            geo: None,
        }
    }

    fn momentum(entries: &[(SocialPlatform, f64)]) -> BTreeMap<SocialPlatform, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn momentum_is_normalised_by_busiest_platform() {
        let signals = vec![
            signal(SocialPlatform::Tiktok, "a", 600),
            signal(SocialPlatform::Tiktok, "b", 400),
            signal(SocialPlatform::Instagram, "c", 333),
        ];
        let m = platform_momentum(&signals);
        assert_eq!(m[&SocialPlatform::Tiktok], 1.0);
        assert!((m[&SocialPlatform::Instagram] - 0.33).abs() < 1e-9);
    }

    #[test]
    fn zero_engagement_does_not_divide_by_zero() {
        let signals = vec![
            signal(SocialPlatform::Tiktok, "a", 0),
            signal(SocialPlatform::Youtube, "b", 0),
        ];
        let m = platform_momentum(&signals);
        assert!(m.values().all(|v| *v == 0.0));
    }

    #[test]
    fn near_equal_platforms_agree_and_share_lead() {
        let m = momentum(&[
            (SocialPlatform::Tiktok, 1.0),
            (SocialPlatform::Instagram, 0.95),
        ]);
        assert_eq!(agreement(&m), 0.85);
        assert_eq!(leader(&m), PlatformLeader::Both);
    }

    #[test]
    fn agreement_bands() {
        let moderate = momentum(&[
            (SocialPlatform::Tiktok, 1.0),
            (SocialPlatform::Youtube, 0.7),
        ]);
        assert_eq!(agreement(&moderate), 0.65);

        let diverging = momentum(&[
            (SocialPlatform::Tiktok, 1.0),
            (SocialPlatform::Youtube, 0.3),
            (SocialPlatform::Instagram, 0.9),
        ]);
        assert_eq!(agreement(&diverging), 0.4);
    }

    #[test]
    fn single_or_no_platform_is_neutral() {
        assert_eq!(agreement(&BTreeMap::new()), SINGLE_PLATFORM_AGREEMENT);
        assert_eq!(
            agreement(&momentum(&[(SocialPlatform::X, 1.0)])),
            SINGLE_PLATFORM_AGREEMENT
        );
    }

    #[test]
    fn leader_cases() {
        assert_eq!(leader(&BTreeMap::new()), PlatformLeader::Unknown);
        assert_eq!(
            leader(&momentum(&[(SocialPlatform::Youtube, 1.0)])),
            PlatformLeader::Platform(SocialPlatform::Youtube)
        );
        assert_eq!(
            leader(&momentum(&[
                (SocialPlatform::Tiktok, 0.4),
                (SocialPlatform::Instagram, 1.0),
                (SocialPlatform::Youtube, 0.2),
            ])),
            PlatformLeader::Platform(SocialPlatform::Instagram)
        );
    }
}
