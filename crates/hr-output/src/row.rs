//! Plain data row types written by output backends.

use hr_core::{ClassifiedEvent, Status};
use hr_replay::{LeaderboardEntry, Totals};

/// One classified trip.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub sequence_index: u64,
    pub source_row:     u64,
    pub haul_unit:      String,
    pub load_unit:      String,
    pub payload:        f64,
    pub status:         Status,
}

impl From<&ClassifiedEvent> for EventRow {
    fn from(ev: &ClassifiedEvent) -> Self {
        Self {
            sequence_index: ev.record.sequence_index as u64,
            source_row:     ev.record.source_row as u64,
            haul_unit:      ev.record.haul_unit.to_string(),
            load_unit:      ev.record.load_unit.to_string(),
            payload:        ev.record.payload,
            status:         ev.status,
        }
    }
}

/// Running totals after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:  u64,
    pub total: u64,
    pub under: u64,
    pub over:  u64,
}

impl TickSummaryRow {
    pub fn new(tick: usize, totals: &Totals) -> Self {
        Self {
            tick:  tick as u64,
            total: totals.total as u64,
            under: totals.under as u64,
            over:  totals.over as u64,
        }
    }
}

/// One ranked loader at the end of the run.  `rank` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank:   u64,
    pub loader: String,
    pub count:  u64,
}

impl LeaderboardRow {
    pub fn ranked(entries: &[LeaderboardEntry]) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| Self { rank: i as u64 + 1, loader: e.loader.to_string(), count: e.count })
            .collect()
    }
}
