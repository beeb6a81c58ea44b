//! `hb-output` — run output writers for the hummingbird arena.
//!
//! | Backend | Files created                            |
//! |---------|------------------------------------------|
//! | CSV     | `episodes.csv`, `tick_summaries.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `hb_sim::SimObserver`.  Episode
//! rows are written as episodes end; tick summaries at every
//! `output_interval_ticks`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hb_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{EpisodeRow, TickSummaryRow};
pub use writer::OutputWriter;
