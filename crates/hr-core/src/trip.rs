//! Trip records and payload classification.

use std::fmt;

use crate::{HaulUnit, LoadUnit};

// ── TripRecord ────────────────────────────────────────────────────────────────

/// One haul-and-dump cycle, normalized and ready for playback.
///
/// Records are only ever built by the normalizer, which guarantees that
/// `payload` is finite and that `sequence_index` equals the record's position
/// in the playback order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripRecord {
    /// 0-based playback position.
    pub sequence_index: usize,
    /// 0-based row index in the input table the record came from.
    pub source_row:     usize,
    pub haul_unit:      HaulUnit,
    /// [`LoadUnit::UNKNOWN`] when the table had no loader for this trip.
    pub load_unit:      LoadUnit,
    /// Measured payload in tonnes.
    pub payload:        f64,
}

// ── Status ────────────────────────────────────────────────────────────────────

/// Payload classification for one trip.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Status {
    Normal,
    Underload,
    Overload,
}

impl Status {
    /// Classify `payload` against the inclusive `[min, max]` normal band.
    ///
    /// Both bounds belong to the normal range.  A non-finite payload is an
    /// upstream bug: the normalizer drops such rows.
    #[inline]
    pub fn classify(payload: f64, min: f64, max: f64) -> Status {
        debug_assert!(payload.is_finite(), "non-finite payload reached the classifier");
        if payload < min {
            Status::Underload
        } else if payload > max {
            Status::Overload
        } else {
            Status::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Normal    => "NORMAL",
            Status::Underload => "UNDERLOAD",
            Status::Overload  => "OVERLOAD",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Free-function form of [`Status::classify`].
#[inline]
pub fn classify(payload: f64, min_payload: f64, max_payload: f64) -> Status {
    Status::classify(payload, min_payload, max_payload)
}

// ── ClassifiedEvent ───────────────────────────────────────────────────────────

/// A [`TripRecord`] paired with its [`Status`].  One per record, never mutated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifiedEvent {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: TripRecord,
    pub status: Status,
}

impl ClassifiedEvent {
    pub fn new(record: TripRecord, min_payload: f64, max_payload: f64) -> Self {
        let status = classify(record.payload, min_payload, max_payload);
        Self { record, status }
    }

    #[inline]
    pub fn is_underload(&self) -> bool {
        self.status == Status::Underload
    }

    #[inline]
    pub fn is_overload(&self) -> bool {
        self.status == Status::Overload
    }
}
