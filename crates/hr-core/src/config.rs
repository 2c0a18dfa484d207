//! Run configuration.
//!
//! A [`SimulationConfig`] is fixed before a run starts and never changes
//! while it is playing.  Applications typically load it from a JSON file
//! (with the `serde` feature) and let command-line flags override fields.

use std::fmt;
use std::time::Duration;

use crate::{HrError, HrResult};

// ── PlaybackSpeed ─────────────────────────────────────────────────────────────

/// Named playback cadence.  Each speed maps to a fixed pause between ticks.
///
/// | Speed     | Delay    |
/// |-----------|----------|
/// | `Slow`    | 1.0 s    |
/// | `Normal`  | 0.5 s    |
/// | `Fast`    | 0.1 s    |
/// | `Turbo`   | 0.01 s   |
/// | `Instant` | none     |
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlaybackSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
    Turbo,
    /// No pause at all; for headless exports.
    Instant,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 5] = [
        PlaybackSpeed::Slow,
        PlaybackSpeed::Normal,
        PlaybackSpeed::Fast,
        PlaybackSpeed::Turbo,
        PlaybackSpeed::Instant,
    ];

    /// Pause inserted after every tick.
    pub fn tick_delay(self) -> Duration {
        match self {
            PlaybackSpeed::Slow    => Duration::from_millis(1_000),
            PlaybackSpeed::Normal  => Duration::from_millis(500),
            PlaybackSpeed::Fast    => Duration::from_millis(100),
            PlaybackSpeed::Turbo   => Duration::from_millis(10),
            PlaybackSpeed::Instant => Duration::ZERO,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlaybackSpeed::Slow    => "slow",
            PlaybackSpeed::Normal  => "normal",
            PlaybackSpeed::Fast    => "fast",
            PlaybackSpeed::Turbo   => "turbo",
            PlaybackSpeed::Instant => "instant",
        }
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// ── SimulationConfig ──────────────────────────────────────────────────────────

/// Default recent-window length (trips kept in each snapshot's trend).
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Parameters for one replay run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Payloads strictly below this are `UNDERLOAD`.  Default: 90 t.
    pub min_payload: f64,

    /// Payloads strictly above this are `OVERLOAD`.  Default: 120 t.
    pub max_payload: f64,

    /// Case-insensitive substring matched against the model column.
    /// Default: `"777"`.
    pub model_filter: String,

    /// Tick cadence.  Default: [`PlaybackSpeed::Normal`] (0.5 s).
    pub speed: PlaybackSpeed,

    /// Number of most recent events carried in every snapshot.
    pub window_size: usize,

    /// Whether snapshots carry the underload leaderboard.
    pub leaderboard: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_payload:  90.0,
            max_payload:  120.0,
            model_filter: "777".to_owned(),
            speed:        PlaybackSpeed::Normal,
            window_size:  DEFAULT_WINDOW_SIZE,
            leaderboard:  true,
        }
    }
}

impl SimulationConfig {
    /// Check the invariants the engine relies on.
    ///
    /// Thresholds must be finite with `min_payload < max_payload`; an
    /// inverted or degenerate band is rejected instead of guessed at.
    pub fn validate(&self) -> HrResult<()> {
        let (min, max) = (self.min_payload, self.max_payload);
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(HrError::InvalidThresholds { min, max });
        }
        if self.window_size == 0 {
            return Err(HrError::Config("window_size must be at least 1".to_owned()));
        }
        Ok(())
    }

    #[inline]
    pub fn tick_delay(&self) -> Duration {
        self.speed.tick_delay()
    }

    #[inline]
    pub fn classify(&self, payload: f64) -> crate::Status {
        crate::classify(payload, self.min_payload, self.max_payload)
    }
}
