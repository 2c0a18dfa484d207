//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `events.csv`
//! - `tick_summaries.csv`
//! - `leaderboard.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, LeaderboardRow, OutputResult, TickSummaryRow};

/// Writes a replay trace to three CSV files.
pub struct CsvWriter {
    events:      Writer<File>,
    summaries:   Writer<File>,
    leaderboard: Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["sequence_index", "source_row", "haul_unit", "load_unit", "payload", "status"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "total", "under", "over"])?;

        let mut leaderboard = Writer::from_path(dir.join("leaderboard.csv"))?;
        leaderboard.write_record(["rank", "loader", "underloads"])?;

        Ok(Self {
            events,
            summaries,
            leaderboard,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.sequence_index.to_string(),
            row.source_row.to_string(),
            row.haul_unit.clone(),
            row.load_unit.clone(),
            row.payload.to_string(),
            row.status.to_string(),
        ])?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.total.to_string(),
            row.under.to_string(),
            row.over.to_string(),
        ])?;
        Ok(())
    }

    fn write_leaderboard(&mut self, rows: &[LeaderboardRow]) -> OutputResult<()> {
        for row in rows {
            self.leaderboard.write_record(&[
                row.rank.to_string(),
                row.loader.clone(),
                row.count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        self.leaderboard.flush()?;
        Ok(())
    }
}
