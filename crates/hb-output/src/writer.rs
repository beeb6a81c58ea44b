//! The `OutputWriter` trait implemented by backend writers.

use crate::{EpisodeRow, OutputResult, TickSummaryRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one finished episode.
    fn write_episode(&mut self, row: &EpisodeRow) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
