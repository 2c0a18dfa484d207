//! `ReplayOutputObserver<W>` — bridges `ReplayObserver` to an `OutputWriter`.

use hr_replay::{ReplayObserver, RunOutcome, Snapshot};

use crate::row::{EventRow, LeaderboardRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`ReplayObserver`] that writes every classified trip, the running
/// totals, and the final leaderboard to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `ReplayObserver`
/// methods have no return value.  After the run returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct ReplayOutputObserver<W: OutputWriter> {
    writer:     W,
    rows:       usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ReplayOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Events written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::error!("trace write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ReplayObserver for ReplayOutputObserver<W> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if let Some(event) = snapshot.latest_event() {
            let result = self.writer.write_event(&EventRow::from(event));
            self.store_err(result);
            self.rows += 1;
        }
        let row = TickSummaryRow::new(snapshot.tick(), &snapshot.totals);
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) {
        if let Some(summary) = outcome.summary() {
            let rows = LeaderboardRow::ranked(&summary.leaderboard);
            let result = self.writer.write_leaderboard(&rows);
            self.store_err(result);
        }
        let result = self.writer.finish();
        self.store_err(result);
    }
}
