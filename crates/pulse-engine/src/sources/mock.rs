use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::synthetic::dummy_signals;
use crate::types::SignalBatch;

/// Dummy social source. Each keyword gets its own RNG stream derived from
/// the source seed, so results do not depend on call order.
#[derive(Debug, Clone, Copy)]
pub struct MockSource {
    seed: u64,
}

impl MockSource {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    #[must_use]
    pub fn fetch_recent_signals(&self, keyword: &str) -> SignalBatch {
        let mut rng = StdRng::seed_from_u64(self.seed ^ fnv1a(keyword));
        SignalBatch {
            signals: dummy_signals(&mut rng, keyword),
            rejected: 0,
        }
    }
}

/// 64-bit FNV-1a over the lowercased keyword.
fn fnv1a(keyword: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    keyword
        .to_lowercase()
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_streams_are_independent_of_call_order() {
        let source = MockSource::new(42);
        let ramen_first = source.fetch_recent_signals("ramen");
        source.fetch_recent_signals("boba");
        assert_eq!(source.fetch_recent_signals("ramen"), ramen_first);
    }

    #[test]
    fn different_keywords_differ() {
        let source = MockSource::new(42);
        assert_ne!(
            source.fetch_recent_signals("ramen").signals[0].engagement,
            source.fetch_recent_signals("boba").signals[0].engagement
        );
    }

    #[test]
    fn fnv1a_known_vector() {
        assert_eq!(fnv1a(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a("a"), 0xaf63_dc4c_8601_ec8c);
    }
}
