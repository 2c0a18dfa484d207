//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `replay.db` file in the configured output directory with
//! three tables: `events`, `tick_summaries`, and `leaderboard`.  Tables are
//! recreated on open so the file always holds exactly one run.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{EventRow, LeaderboardRow, OutputResult, TickSummaryRow};

/// Writes a replay trace to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `replay.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("replay.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS events;
             DROP TABLE IF EXISTS tick_summaries;
             DROP TABLE IF EXISTS leaderboard;
             CREATE TABLE events (
                 sequence_index INTEGER PRIMARY KEY,
                 source_row     INTEGER NOT NULL,
                 haul_unit      TEXT    NOT NULL,
                 load_unit      TEXT    NOT NULL,
                 payload        REAL    NOT NULL,
                 status         TEXT    NOT NULL
             );
             CREATE TABLE tick_summaries (
                 tick  INTEGER PRIMARY KEY,
                 total INTEGER NOT NULL,
                 under INTEGER NOT NULL,
                 over  INTEGER NOT NULL
             );
             CREATE TABLE leaderboard (
                 rank       INTEGER PRIMARY KEY,
                 loader     TEXT    NOT NULL,
                 underloads INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO events \
             (sequence_index, source_row, haul_unit, load_unit, payload, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.sequence_index as i64,
                row.source_row as i64,
                row.haul_unit,
                row.load_unit,
                row.payload,
                row.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, total, under, over) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.tick as i64, row.total as i64, row.under as i64, row.over as i64],
        )?;
        Ok(())
    }

    fn write_leaderboard(&mut self, rows: &[LeaderboardRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO leaderboard (rank, loader, underloads) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.rank as i64, row.loader, row.count as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
