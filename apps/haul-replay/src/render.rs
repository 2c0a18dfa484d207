//! Terminal and JSON-lines renderers.

use std::fmt::Display;
use std::io::Write;

use hr_core::{ClassifiedEvent, SimulationConfig, Status};
use hr_replay::{
    LeaderboardEntry, ReplayObserver, RunOutcome, RunSummary, Snapshot, UnderloadAlert,
};
use serde::Serialize;

fn icon(status: Status) -> &'static str {
    match status {
        Status::Normal    => "✅",
        Status::Underload => "⚠️",
        Status::Overload  => "⛔",
    }
}

pub(crate) fn feed_line(ev: &ClassifiedEvent) -> String {
    format!(
        "{} {:<10} {:>7.1} t  ({})",
        icon(ev.status),
        ev.record.haul_unit,
        ev.record.payload,
        ev.record.load_unit,
    )
}

pub(crate) fn leaderboard_line(rank: impl Display, loader: impl Display, count: impl Display) -> String {
    format!("{rank:<4} {loader:<12} {count:>6}")
}

// ── Console ───────────────────────────────────────────────────────────────────

/// Human-readable live feed: one line per trip, alerts inline, leaderboard
/// and recent feed at the end.
pub struct ConsoleRenderer {
    model:      String,
    min:        f64,
    max:        f64,
    feed_len:   usize,
    total:      usize,
    last:       Option<Snapshot>,
}

impl ConsoleRenderer {
    pub fn new(config: &SimulationConfig, feed_len: usize) -> Self {
        Self {
            model:    config.model_filter.clone(),
            min:      config.min_payload,
            max:      config.max_payload,
            feed_len,
            total:    0,
            last:     None,
        }
    }

    fn print_leaderboard(board: &[LeaderboardEntry]) {
        if board.is_empty() {
            return;
        }
        println!();
        println!("Underload leaderboard");
        println!("{}", leaderboard_line("#", "Loader", "Count"));
        println!("{}", "-".repeat(24));
        for (i, entry) in board.iter().enumerate() {
            println!("{}", leaderboard_line(i + 1, &entry.loader, entry.count));
        }
    }

    fn print_summary(&self, summary: &RunSummary) {
        let t = &summary.totals;
        println!("Total trips {}  |  underload {}  |  overload {}  |  normal {}", t.total, t.under, t.over, t.normal());
        Self::print_leaderboard(&summary.leaderboard);

        if let Some(last) = &self.last {
            println!();
            println!("Last {} trips", self.feed_len.min(last.recent.len()));
            for ev in last.latest(self.feed_len) {
                println!("  {}", feed_line(ev));
            }
        }
    }
}

impl ReplayObserver for ConsoleRenderer {
    fn on_run_start(&mut self, total: usize) {
        self.total = total;
        println!(
            "Replaying {total} trips for model {:?}, normal band {}–{} t.  Press Enter to stop.",
            self.model, self.min, self.max,
        );
        println!();
    }

    fn on_underload(&mut self, alert: &UnderloadAlert) {
        println!(
            "   ⚠️  Alert! {} underload: {} t (loader {})",
            alert.haul_unit, alert.payload, alert.load_unit,
        );
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let t = &snapshot.totals;
        let pct = if self.total == 0 { 0.0 } else { 100.0 * t.total as f64 / self.total as f64 };
        if let Some(ev) = snapshot.latest_event() {
            println!(
                "[{:>5}/{:<5} {:>5.1}%] under {:>4}  over {:>4}  | {}",
                t.total,
                self.total,
                pct,
                t.under,
                t.over,
                feed_line(ev),
            );
        }
        self.last = Some(snapshot.clone());
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed(summary) => {
                println!();
                println!("✅ Replay complete.");
                self.print_summary(summary);
            }
            RunOutcome::Cancelled(summary) => {
                println!();
                println!("⏹  Stopped early after {} of {} trips.", summary.emitted, summary.expected);
                self.print_summary(summary);
            }
            RunOutcome::Failed(_) => {}
        }
    }
}

// ── JSON lines ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    Start { total: usize },
    Underload(&'a UnderloadAlert),
    Snapshot(&'a Snapshot),
    End { state: String, summary: Option<&'a RunSummary> },
}

/// One JSON object per hook call, newline-delimited.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, line: &Line<'_>) {
        let result = serde_json::to_writer(&mut self.out, line)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            log::error!("failed to write JSON line: {e}");
        }
    }
}

impl<W: Write> ReplayObserver for JsonLinesRenderer<W> {
    fn on_run_start(&mut self, total: usize) {
        self.emit(&Line::Start { total });
    }

    fn on_underload(&mut self, alert: &UnderloadAlert) {
        self.emit(&Line::Underload(alert));
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.emit(&Line::Snapshot(snapshot));
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) {
        self.emit(&Line::End { state: outcome.state().to_string(), summary: outcome.summary() });
    }
}
