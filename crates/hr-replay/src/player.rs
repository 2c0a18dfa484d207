//! The Playback Scheduler and its run outcome types.

use std::fmt;

use hr_core::{ClassifiedEvent, SimulationConfig, TripRecord};

use crate::{
    Aggregator, LeaderboardEntry, PlaybackControl, ReplayError, ReplayObserver, ReplayResult,
    Totals, UnderloadAlert,
};

// ── State and outcome ─────────────────────────────────────────────────────────

/// Lifecycle of a [`Player`].
///
/// ```text
/// Idle ─▶ Running ─▶ Completed | Cancelled
///   └──────────────▶ Failed        (sequence rejected, nothing emitted)
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PlayerState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PlayerState::Idle      => "idle",
            PlayerState::Running   => "running",
            PlayerState::Completed => "completed",
            PlayerState::Cancelled => "cancelled",
            PlayerState::Failed    => "failed",
        })
    }
}

/// What a finished or stopped run leaves behind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunSummary {
    /// Snapshots delivered.
    pub emitted:     usize,
    /// Records in the sequence.
    pub expected:    usize,
    pub totals:      Totals,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Stopped early; the summary covers the ticks that did run.
    Cancelled(RunSummary),
    /// Rejected before the first tick.
    Failed(ReplayError),
}

impl RunOutcome {
    pub fn state(&self) -> PlayerState {
        match self {
            RunOutcome::Completed(_) => PlayerState::Completed,
            RunOutcome::Cancelled(_) => PlayerState::Cancelled,
            RunOutcome::Failed(_)    => PlayerState::Failed,
        }
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunOutcome::Completed(s) | RunOutcome::Cancelled(s) => Some(s),
            RunOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ReplayError> {
        match self {
            RunOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Drives a normalized record sequence through classification and
/// aggregation, one record per tick.
///
/// Per tick: poll the control, classify, fire the underload alert if any,
/// apply to the aggregator, hand the snapshot to the observer, then pause
/// for the configured tick delay.  Records are never skipped or reordered.
pub struct Player {
    config:     SimulationConfig,
    aggregator: Aggregator,
    state:      PlayerState,
}

impl Player {
    /// Validate `config` and create an idle player.
    pub fn new(config: SimulationConfig) -> ReplayResult<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: Aggregator::from_config(&config),
            config,
            state:      PlayerState::Idle,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Aggregated state of the current or most recent run.
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Play `sequence` to the end or until `control` says stop.
    ///
    /// The aggregator is reset first, even when the sequence is rejected, so
    /// a player can be reused for several runs.  A sequence that is empty, out of order, or carries a
    /// non-finite payload fails before any hook other than
    /// [`on_run_end`][ReplayObserver::on_run_end] is called.
    pub fn run<O, C>(&mut self, sequence: &[TripRecord], observer: &mut O, control: &C) -> RunOutcome
    where
        O: ReplayObserver + ?Sized,
        C: PlaybackControl + ?Sized,
    {
        self.aggregator.reset();
        if let Err(e) = validate_sequence(sequence) {
            log::error!("playback rejected: {e}");
            return self.finish(RunOutcome::Failed(e), observer);
        }

        self.state = PlayerState::Running;
        let delay = self.config.tick_delay();
        log::info!(
            "replaying {} trips at {} speed ({:?} per tick)",
            sequence.len(),
            self.config.speed,
            delay,
        );
        observer.on_run_start(sequence.len());

        for record in sequence {
            if !control.should_continue() {
                log::warn!("playback stopped after {} of {} trips", self.aggregator.len(), sequence.len());
                let summary = self.summary(sequence.len());
                return self.finish(RunOutcome::Cancelled(summary), observer);
            }
            self.tick(record.clone(), observer);
            control.pause(delay);
        }

        let summary = self.summary(sequence.len());
        log::info!(
            "playback complete: {} trips, {} underloaded, {} overloaded",
            summary.totals.total,
            summary.totals.under,
            summary.totals.over,
        );
        self.finish(RunOutcome::Completed(summary), observer)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn tick<O: ReplayObserver + ?Sized>(&mut self, record: TripRecord, observer: &mut O) {
        let event = ClassifiedEvent::new(record, self.config.min_payload, self.config.max_payload);

        if event.is_underload() {
            let alert = UnderloadAlert {
                sequence_index: event.record.sequence_index,
                haul_unit:      event.record.haul_unit.clone(),
                load_unit:      event.record.load_unit.clone(),
                payload:        event.record.payload,
            };
            log::warn!(
                "underload: {} carried {} t (loaded by {})",
                alert.haul_unit,
                alert.payload,
                alert.load_unit,
            );
            observer.on_underload(&alert);
        }

        let snapshot = self.aggregator.apply(event);
        log::trace!("tick {}: {:?}", snapshot.tick(), snapshot.totals);
        observer.on_snapshot(&snapshot);
    }

    fn summary(&self, expected: usize) -> RunSummary {
        RunSummary {
            emitted:     self.aggregator.len(),
            expected,
            totals:      self.aggregator.totals(),
            leaderboard: if self.config.leaderboard {
                self.aggregator.leaderboard()
            } else {
                Vec::new()
            },
        }
    }

    fn finish<O: ReplayObserver + ?Sized>(&mut self, outcome: RunOutcome, observer: &mut O) -> RunOutcome {
        self.state = outcome.state();
        observer.on_run_end(&outcome);
        outcome
    }
}

/// Reject sequences the per-tick path is not defined for.
fn validate_sequence(sequence: &[TripRecord]) -> ReplayResult<()> {
    if sequence.is_empty() {
        return Err(ReplayError::EmptySequence);
    }
    for (position, record) in sequence.iter().enumerate() {
        if record.sequence_index != position {
            return Err(ReplayError::OutOfSequence { position, found: record.sequence_index });
        }
        if !record.payload.is_finite() {
            return Err(ReplayError::NonFinitePayload { position, payload: record.payload });
        }
    }
    Ok(())
}
