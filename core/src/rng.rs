//! Seeded random number generation.
//!
//! RULE: Nothing in the desk may call a platform RNG.
//! Every random draw flows through a `DeskRng` seeded from configuration,
//! so a session with the same seed and the same requests is reproducible.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct DeskRng {
    inner: Pcg64Mcg,
}

impl DeskRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a float in [low, high]. Returns `low` when the range is empty.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        (low + (high - low) * self.next_f64()).min(high)
    }
}
