//! Deterministic RNG wrappers and the injectable [`RandomSource`] seam.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! Flower resets at episode start draw from the resetting agent's stream.
//! `SimRng` sits above the agents: it derives per-arena seeds when several
//! arenas run from one root seed.  Every random draw in the arena logic goes
//! through the [`RandomSource`] trait, so tests can substitute a scripted
//! source and assert exact spawn/jitter outcomes.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RandomSource ──────────────────────────────────────────────────────────────

/// The subset of random draws the arena logic needs.
///
/// Ranges follow the half-open/inclusive conventions noted per method.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn value(&mut self) -> f32;

    /// Uniform float in `[lo, hi]`.  Returns `lo` when `lo >= hi`.
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32;

    /// Uniform index in `[lo, hi)`.  Returns `lo` when `lo >= hi`.
    fn range_usize(&mut self, lo: usize, hi: usize) -> usize;
}

fn sample_f32(rng: &mut SmallRng, lo: f32, hi: f32) -> f32 {
    if lo >= hi { lo } else { rng.gen_range(lo..=hi) }
}

fn sample_usize(rng: &mut SmallRng, lo: usize, hi: usize) -> usize {
    if lo >= hi { lo } else { rng.gen_range(lo..hi) }
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Used for spawn placement and by stochastic action sources.  Agents never
/// share RNG state, so adding agents does not perturb existing ones.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for AgentRng {
    #[inline]
    fn value(&mut self) -> f32 {
        self.0.r#gen()
    }

    #[inline]
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        sample_f32(&mut self.0, lo, hi)
    }

    #[inline]
    fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        sample_usize(&mut self.0, lo, hi)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for draws that belong to no single agent.
///
/// Parallel arenas get their own seeds via [`SimRng::next_seed`].
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Draw a fresh 64-bit seed, e.g. for a `SimConfig`.
    #[inline]
    pub fn next_seed(&mut self) -> u64 {
        self.0.r#gen()
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn value(&mut self) -> f32 {
        self.0.r#gen()
    }

    #[inline]
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        sample_f32(&mut self.0, lo, hi)
    }

    #[inline]
    fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        sample_usize(&mut self.0, lo, hi)
    }
}
