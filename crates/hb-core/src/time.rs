//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter advanced once per fixed
//! physics step.  The nominal step is 0.02 s (50 Hz); all resource mutation
//! (feeding, target refresh, rewards) happens on fixed ticks only.
//!
//! Integer ticks keep episode bookkeeping exact: `MaxStep`, decision cadence
//! and output intervals are all plain integer comparisons.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── FixedClock ────────────────────────────────────────────────────────────────

/// Fixed-timestep clock.  Cheap to copy; holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedClock {
    /// Seconds per fixed tick.  Default 0.02.
    pub fixed_delta_secs: f32,
    /// The current tick, advanced by `FixedClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl FixedClock {
    pub fn new(fixed_delta_secs: f32) -> Self {
        Self { fixed_delta_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.fixed_delta_secs as f64
    }
}

impl fmt::Display for FixedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Seconds per fixed tick.  Default: 0.02 (50 Hz).
    pub fixed_delta_secs: f32,

    /// Total ticks `Sim::run` simulates.
    pub total_ticks: u64,

    /// Fixed ticks per training episode.  0 = unbounded (continuous play).
    pub max_step: u64,

    /// Fixed ticks between policy decisions.  The last action is repeated on
    /// the ticks in between.  Values below 1 are treated as 1.
    pub decision_period: u32,

    /// Emit a tick summary to observers every N ticks.  0 disables.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                  0,
            fixed_delta_secs:      0.02,
            total_ticks:           50_000,
            max_step:              5_000,
            decision_period:       5,
            output_interval_ticks: 50,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Decision period with the lower bound applied.
    #[inline]
    pub fn effective_decision_period(&self) -> u64 {
        self.decision_period.max(1) as u64
    }

    /// Construct a `FixedClock` pre-configured for this run.
    pub fn make_clock(&self) -> FixedClock {
        FixedClock::new(self.fixed_delta_secs)
    }

    /// Reject configurations the tick loop cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.fixed_delta_secs <= 0.0 || !self.fixed_delta_secs.is_finite() {
            return Err(CoreError::Config(format!(
                "fixed_delta_secs must be a positive finite number, got {}",
                self.fixed_delta_secs
            )));
        }
        Ok(())
    }
}
