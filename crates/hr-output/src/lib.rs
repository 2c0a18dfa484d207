//! `hr-output` — replay trace writers.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                         |
//! |-----------|---------|-------------------------------------------------------|
//! | *(none)*  | CSV     | `events.csv`, `tick_summaries.csv`, `leaderboard.csv` |
//! | `sqlite`  | SQLite  | `replay.db`                                           |
//!
//! Both implement [`OutputWriter`] and are driven by
//! [`ReplayOutputObserver`], which implements `hr_replay::ReplayObserver`.
//! A trace describes one run only; nothing here is read back.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hr_output::{CsvWriter, ReplayOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./trace"))?;
//! let mut obs = ReplayOutputObserver::new(writer);
//! replay.run(&mut obs, &StopSignal::new());
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ReplayOutputObserver;
pub use row::{EventRow, LeaderboardRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
