//! Injectable randomness for score variety
//!
//! Repeated uploads of the same photo get slightly different scores so the
//! UI does not look canned. Tests and reproducible runs use [`NoJitter`] or a
//! seeded [`RngJitter`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{report::ALTERNATIVE_GAP_RANGE, scoring::JITTER_RANGE};

/// Source of the two random terms used in a diagnosis
pub trait JitterSource {
    /// Offset added to a candidate score, within [-5, 5]
    fn score_offset(&mut self) -> f32;

    /// Per-rank confidence drop for alternative diagnoses, within [10, 15]
    fn alternative_gap(&mut self) -> f32;
}

/// Deterministic source: zero offset, smallest gap
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn score_offset(&mut self) -> f32 {
        0.0
    }

    fn alternative_gap(&mut self) -> f32 {
        ALTERNATIVE_GAP_RANGE.0
    }
}

/// Uniform jitter drawn from any `rand` generator
#[derive(Debug, Clone)]
pub struct RngJitter<R> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<StdRng> {
    /// Reproducible jitter
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> JitterSource for RngJitter<R> {
    fn score_offset(&mut self) -> f32 {
        self.rng.gen_range(JITTER_RANGE.0..=JITTER_RANGE.1)
    }

    fn alternative_gap(&mut self) -> f32 {
        self.rng
            .gen_range(ALTERNATIVE_GAP_RANGE.0..=ALTERNATIVE_GAP_RANGE.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_jitter_is_constant() {
        let mut jitter = NoJitter;
        assert_eq!(jitter.score_offset(), 0.0);
        assert_eq!(jitter.alternative_gap(), 10.0);
    }

    #[test]
    fn test_rng_jitter_in_range() {
        let mut jitter = RngJitter::seeded(7);
        for _ in 0..1000 {
            let offset = jitter.score_offset();
            assert!((-5.0..=5.0).contains(&offset));
            let gap = jitter.alternative_gap();
            assert!((10.0..=15.0).contains(&gap));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RngJitter::seeded(42);
        let mut b = RngJitter::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.score_offset(), b.score_offset());
        }
    }
}
