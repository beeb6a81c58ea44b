//! Simulation observer trait for progress reporting and data collection.

use hb_agent::{Action, Arena, DecisionRequest, EpisodeSummary, HummingbirdAgent};
use hb_core::Tick;

/// Counters for one fixed tick, handed to [`SimObserver::on_tick_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickStats {
    /// Agents that asked their action source for a new action.
    pub decisions:      usize,
    /// Trigger contacts that actually fed.
    pub feeds:          usize,
    /// Nectar removed from flowers this tick.
    pub nectar_taken:   f32,
    /// Boundary / obstacle collision enters.
    pub collisions:     usize,
    /// Episodes that reached `max_step` and restarted.
    pub episodes_ended: usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: episode printer
///
/// ```rust,ignore
/// struct EpisodePrinter;
///
/// impl SimObserver for EpisodePrinter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) {
///         println!("agent {} episode {}: {:.3}", summary.agent, summary.episode, summary.reward);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after an action source answered a decision request.
    fn on_decision(&mut self, _request: &DecisionRequest, _action: &Action) {}

    /// Called when an agent's episode ends, before the next one begins.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    ///
    /// Read-only access to every agent and the arena lets output writers
    /// record state without the sim knowing any output format.
    fn on_snapshot(
        &mut self,
        _tick:   Tick,
        _agents: &[HummingbirdAgent],
        _arena:  &Arena,
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
