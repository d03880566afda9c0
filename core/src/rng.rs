//! Deterministic random number generation.
//!
//! RULE: Reference-table generation never calls a platform RNG directly.
//! All draws flow through a single GeneratorRng stream seeded from the
//! table's recorded seed, so a persisted table can always be rebuilt
//! bit-for-bit from its seed.
//!
//! The one exception is `fresh_seed()`, which picks a seed from entropy
//! when none is configured. That seed is persisted with the table.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A seeded, deterministic RNG stream for reference-table generation.
pub struct GeneratorRng {
    inner: Pcg64Mcg,
}

impl GeneratorRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in the half-open range [low, high).
    pub fn range(&mut self, low: i64, high: i64) -> i64 {
        assert!(high > low, "empty range [{low}, {high})");
        let span = high.abs_diff(low);
        low + self.next_u64_below(span) as i64
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.next_u64_below(2) == 1
    }
}

/// Pick a new seed from OS entropy. Used only when no seed is configured.
pub fn fresh_seed() -> u64 {
    rand::thread_rng().next_u64()
}
