//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `episodes.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EpisodeRow, OutputResult, TickSummaryRow};

pub const EPISODE_HEADERS: [&str; 7] =
    ["agent_id", "episode", "end_tick", "steps", "reward", "trailing_reward", "nectar"];

pub const TICK_SUMMARY_HEADERS: [&str; 7] = [
    "tick",
    "elapsed_secs",
    "decisions",
    "feeds",
    "nectar_obtained",
    "flowers_with_nectar",
    "remaining_nectar",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    episodes:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    ///
    /// `dir` is created if it does not exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut episodes = Writer::from_path(dir.join("episodes.csv"))?;
        episodes.write_record(EPISODE_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TICK_SUMMARY_HEADERS)?;

        Ok(Self { episodes, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_episode(&mut self, row: &EpisodeRow) -> OutputResult<()> {
        self.episodes.write_record(&[
            row.agent_id.to_string(),
            row.episode.to_string(),
            row.end_tick.to_string(),
            row.steps.to_string(),
            row.reward.to_string(),
            row.trailing_reward.to_string(),
            row.nectar.to_string(),
        ])?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.elapsed_secs),
            row.decisions.to_string(),
            row.feeds.to_string(),
            row.nectar_obtained.to_string(),
            row.flowers_with_nectar.to_string(),
            row.remaining_nectar.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.episodes.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
