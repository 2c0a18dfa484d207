//! Pacing and cooperative cancellation.
//!
//! The player asks its [`PlaybackControl`] two things: whether to process
//! the next record, and to wait out the tick delay.  Cancellation only takes
//! effect between ticks; a record already being classified and aggregated
//! always finishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};

/// Host-side control over a running playback.
pub trait PlaybackControl {
    /// Polled before every tick.  `false` stops the run as `Cancelled`.
    fn should_continue(&self) -> bool;

    /// Wait out the delay after a tick.  May return early when a stop is
    /// requested.  The default blocks for the full delay.
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

// ── StopSignal ────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct StopInner {
    stopped: AtomicBool,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

/// Cloneable stop handle.  One clone drives the player, the others can be
/// moved to whatever thread decides to stop it.
///
/// [`pause`][PlaybackControl::pause] is a timed receive on an internal
/// channel, so a [`stop`][Self::stop] wakes a waiting player immediately
/// instead of after the remaining tick delay.
#[derive(Clone, Debug)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            inner: Arc::new(StopInner { stopped: AtomicBool::new(false), wake_tx, wake_rx }),
        }
    }

    /// Request a stop.  Idempotent.
    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        // Full channel means a wake-up is already pending.
        let _ = self.inner.wake_tx.try_send(());
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackControl for StopSignal {
    fn should_continue(&self) -> bool {
        !self.is_stopped()
    }

    fn pause(&self, delay: Duration) {
        if delay.is_zero() || self.is_stopped() {
            return;
        }
        let _ = self.inner.wake_rx.recv_timeout(delay);
    }
}

// ── Simple controls ───────────────────────────────────────────────────────────

/// Polls a closure before each tick; sleeps the full delay between ticks.
pub struct ContinueWhile<F: Fn() -> bool>(pub F);

impl<F: Fn() -> bool> PlaybackControl for ContinueWhile<F> {
    fn should_continue(&self) -> bool {
        (self.0)()
    }
}

/// Never stops and never waits.  For batch exports and tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unpaced;

impl PlaybackControl for Unpaced {
    fn should_continue(&self) -> bool {
        true
    }

    fn pause(&self, _delay: Duration) {}
}
