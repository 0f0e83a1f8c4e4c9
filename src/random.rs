//! Seedable random number generation.
//!
//! Every component that needs randomness takes `&mut R where R: Rng`.
//! Runners create exactly one generator per run through [`create_rng`],
//! so two runs with the same seed draw the same sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates the generator used by a single search run.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Resolves an optional seed, drawing a fresh one from the thread-local
/// generator when `None`.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Draws two distinct indices in `[0, n)`.
///
/// Requires `n >= 2`.
pub(crate) fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    debug_assert!(n >= 2);
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n);
    while a == b {
        b = rng.random_range(0..n);
    }
    (a, b)
}
