//! Immutable per-tick views handed to observers.

use hr_core::{ClassifiedEvent, LoadUnit};

/// Cumulative counts over the whole history at one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Totals {
    pub total: usize,
    pub under: usize,
    pub over:  usize,
}

impl Totals {
    #[inline]
    pub fn normal(&self) -> usize {
        self.total - self.under - self.over
    }
}

/// One leaderboard row: how many underloads a loading unit has produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LeaderboardEntry {
    pub loader: LoadUnit,
    pub count:  u64,
}

/// State of the run right after one tick.
///
/// Owns its data; nothing in it points back into the aggregator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub totals:      Totals,
    /// The newest `window_size` events, oldest first.
    pub recent:      Vec<ClassifiedEvent>,
    /// Loaders by underload count, highest first.  Empty when the
    /// leaderboard is switched off.
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl Snapshot {
    /// The event processed on this tick.
    pub fn latest_event(&self) -> Option<&ClassifiedEvent> {
        self.recent.last()
    }

    /// Up to `n` newest events, newest first (live feed order).
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &ClassifiedEvent> {
        self.recent.iter().rev().take(n)
    }

    /// 0-based index of this tick.
    pub fn tick(&self) -> usize {
        self.totals.total.saturating_sub(1)
    }
}
