//! Run-state accumulator.
//!
//! The [`Aggregator`] owns the history of a single run.  It is mutated only
//! by [`apply`][Aggregator::apply] and emptied only by
//! [`reset`][Aggregator::reset].
//!
//! # Leaderboard ordering
//!
//! Loaders are ranked by underload count, descending.  Ties go to the loader
//! that reached the shared count first: each tally remembers the history
//! position at which its current count was reached, and that position is the
//! secondary (ascending) sort key.  The order is therefore a pure function of
//! the event sequence.

use std::collections::HashMap;

use hr_core::{ClassifiedEvent, LoadUnit, SimulationConfig, Status};

use crate::snapshot::{LeaderboardEntry, Snapshot, Totals};

#[derive(Copy, Clone, Debug)]
struct Tally {
    count:      u64,
    /// History position of the event that produced `count`.
    reached_at: usize,
}

/// Cumulative counts, recent window, and underload leaderboard for one run.
#[derive(Clone, Debug)]
pub struct Aggregator {
    history:          Vec<ClassifiedEvent>,
    underload_counts: HashMap<LoadUnit, Tally>,
    /// Running counts over `history`; updated in the same call as the push.
    under:            usize,
    over:             usize,
    window_size:      usize,
    leaderboard:      bool,
}

impl Aggregator {
    /// `window_size` is clamped to at least 1.
    pub fn new(window_size: usize, leaderboard: bool) -> Self {
        Self {
            history: Vec::new(),
            underload_counts: HashMap::new(),
            under: 0,
            over: 0,
            window_size: window_size.max(1),
            leaderboard,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.window_size, config.leaderboard)
    }

    /// Forget everything.  Call between runs, never during one.
    pub fn reset(&mut self) {
        self.history.clear();
        self.underload_counts.clear();
        self.under = 0;
        self.over = 0;
    }

    /// Record `event` and return the resulting snapshot.
    pub fn apply(&mut self, event: ClassifiedEvent) -> Snapshot {
        let position = self.history.len();
        match event.status {
            Status::Underload => {
                self.under += 1;
                let tally = self
                    .underload_counts
                    .entry(event.record.load_unit.clone())
                    .or_insert(Tally { count: 0, reached_at: position });
                tally.count += 1;
                tally.reached_at = position;
            }
            Status::Overload => self.over += 1,
            Status::Normal => {}
        }
        self.history.push(event);
        self.snapshot()
    }

    /// Snapshot of the current state without applying anything.
    pub fn snapshot(&self) -> Snapshot {
        let start = self.history.len().saturating_sub(self.window_size);
        Snapshot {
            totals:      self.totals(),
            recent:      self.history[start..].to_vec(),
            leaderboard: if self.leaderboard { self.leaderboard() } else { Vec::new() },
        }
    }

    pub fn totals(&self) -> Totals {
        Totals { total: self.history.len(), under: self.under, over: self.over }
    }

    /// Full leaderboard, independent of the `leaderboard` display flag.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut ranked: Vec<(&LoadUnit, &Tally)> = self.underload_counts.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count.cmp(&a.count).then(a.reached_at.cmp(&b.reached_at))
        });
        ranked
            .into_iter()
            .map(|(loader, tally)| LeaderboardEntry { loader: loader.clone(), count: tally.count })
            .collect()
    }

    /// Underload count for one loader (0 if it never under-filled).
    pub fn underloads_for(&self, loader: &LoadUnit) -> u64 {
        self.underload_counts.get(loader).map_or(0, |t| t.count)
    }

    pub fn history(&self) -> &[ClassifiedEvent] {
        &self.history
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}
