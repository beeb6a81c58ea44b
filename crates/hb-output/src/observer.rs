//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use hb_agent::{Arena, EpisodeSummary, HummingbirdAgent};
use hb_core::{SimConfig, Tick};
use hb_sim::{SimObserver, TickStats};

use crate::row::{EpisodeRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes finished episodes and snapshot-tick
/// summaries to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:           W,
    fixed_delta_secs: f32,
    last_stats:       TickStats,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for tick → time
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            fixed_delta_secs: config.fixed_delta_secs,
            last_stats:       TickStats::default(),
            last_error:       None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        let row = EpisodeRow {
            agent_id:        summary.agent.0,
            episode:         summary.episode,
            end_tick:        summary.tick.0,
            steps:           summary.steps,
            reward:          summary.reward,
            trailing_reward: summary.trailing_reward,
            nectar:          summary.nectar,
        };
        let result = self.writer.write_episode(&row);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        self.last_stats = *stats;
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[HummingbirdAgent], arena: &Arena) {
        let row = TickSummaryRow {
            tick:                tick.0,
            elapsed_secs:        tick.0 as f64 * self.fixed_delta_secs as f64,
            decisions:           self.last_stats.decisions as u64,
            feeds:               self.last_stats.feeds as u64,
            nectar_obtained:     agents.iter().map(HummingbirdAgent::nectar_obtained).sum(),
            flowers_with_nectar: arena.flowers.flowers_with_nectar() as u32,
            remaining_nectar:    arena.flowers.remaining_nectar(),
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
