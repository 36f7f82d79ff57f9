//! Deterministic per-ped RNG.
//!
//! # Determinism strategy
//!
//! Each ped gets its own `SmallRng` seeded by
//!
//!   seed = global_seed XOR (ped_id * MIXING_CONSTANT)
//!
//! so peds never share RNG state and adding peds at the end of the list
//! does not disturb existing seeds.  Shot rolls draw from the shooter's
//! own generator, so a mission replays identically for a given seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::PedId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── PedRng ────────────────────────────────────────────────────────────────────

/// Per-ped deterministic RNG.
#[derive(Clone, Debug)]
pub struct PedRng(SmallRng);

impl PedRng {
    /// Seed deterministically from the run's global seed and a ped ID.
    pub fn new(global_seed: u64, ped: PedId) -> Self {
        let seed = global_seed ^ (ped.0 as u64).wrapping_mul(MIXING_CONSTANT);
        PedRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
