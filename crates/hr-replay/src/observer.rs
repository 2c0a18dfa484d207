//! Replay observer trait for rendering, alerting, and export.

use hr_core::{HaulUnit, LoadUnit};

use crate::{RunOutcome, Snapshot};

/// Fired once for every trip classified as `UNDERLOAD`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnderloadAlert {
    pub sequence_index: usize,
    pub haul_unit:      HaulUnit,
    pub load_unit:      LoadUnit,
    pub payload:        f64,
}

/// Callbacks invoked by [`Player::run`][crate::Player::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Every hook is called on the playback
/// thread and should return promptly; the player does not tick while a hook
/// is running.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { total: usize }
///
/// impl ReplayObserver for Progress {
///     fn on_run_start(&mut self, total: usize) { self.total = total; }
///     fn on_snapshot(&mut self, snap: &Snapshot) {
///         println!("{}/{} trips", snap.totals.total, self.total);
///     }
/// }
/// ```
pub trait ReplayObserver {
    /// Called once after the sequence was validated, before the first tick.
    fn on_run_start(&mut self, _total: usize) {}

    /// Called for an underloaded trip, before that tick's snapshot.
    fn on_underload(&mut self, _alert: &UnderloadAlert) {}

    /// Called once per tick with the state after that tick.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once when the run ends, whatever the outcome.
    fn on_run_end(&mut self, _outcome: &RunOutcome) {}
}

/// A [`ReplayObserver`] that does nothing.
pub struct NoopObserver;

impl ReplayObserver for NoopObserver {}

impl<O: ReplayObserver + ?Sized> ReplayObserver for &mut O {
    fn on_run_start(&mut self, total: usize) {
        (**self).on_run_start(total);
    }

    fn on_underload(&mut self, alert: &UnderloadAlert) {
        (**self).on_underload(alert);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        (**self).on_snapshot(snapshot);
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) {
        (**self).on_run_end(outcome);
    }
}

/// Fan out to two observers, first `A` then `B`.
impl<A: ReplayObserver, B: ReplayObserver> ReplayObserver for (A, B) {
    fn on_run_start(&mut self, total: usize) {
        self.0.on_run_start(total);
        self.1.on_run_start(total);
    }

    fn on_underload(&mut self, alert: &UnderloadAlert) {
        self.0.on_underload(alert);
        self.1.on_underload(alert);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.0.on_snapshot(snapshot);
        self.1.on_snapshot(snapshot);
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) {
        self.0.on_run_end(outcome);
        self.1.on_run_end(outcome);
    }
}
