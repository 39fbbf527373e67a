//! Deterministic utilities for reproducible training
//!
//! Seeded RNG construction and the split tie-breaking order, so that the
//! same seed always yields the same dataset and the same tree.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Seeded RNG shared by the generator and the tree builder
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Feature visitation order for split search, permuted by `seed`
pub fn feature_order(feature_count: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..feature_count).collect();
    order.shuffle(&mut seeded_rng(seed));
    order
}

/// Deterministic tie-breaker for split selection.
/// Lower compares first: earlier rank in the permuted feature order, then
/// lower threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SplitTieBreaker {
    pub feature_rank: usize,
    pub threshold: u8,
}

impl SplitTieBreaker {
    pub fn new(feature_rank: usize, threshold: u8) -> Self {
        Self {
            feature_rank,
            threshold,
        }
    }
}
