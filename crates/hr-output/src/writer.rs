//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EventRow, LeaderboardRow, OutputResult, TickSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// The observer never propagates these errors; they are
/// stored internally and retrieved with
/// [`ReplayOutputObserver::take_error`][crate::ReplayOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one classified trip.
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write the final leaderboard.  Called at most once per run.
    fn write_leaderboard(&mut self, rows: &[LeaderboardRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
