//! `hr-replay` — aggregation and cancellable playback for the haul-replay
//! engine.
//!
//! # Tick loop
//!
//! ```text
//! for record in sequence:
//!   ① Poll      — PlaybackControl::should_continue; false → Cancelled
//!   ② Classify  — payload vs [min, max] → NORMAL / UNDERLOAD / OVERLOAD
//!   ③ Alert     — UNDERLOAD → ReplayObserver::on_underload
//!   ④ Aggregate — Aggregator::apply → Snapshot
//!   ⑤ Emit      — ReplayObserver::on_snapshot
//!   ⑥ Pause     — PlaybackControl::pause(tick delay), interruptible
//! ```
//!
//! # Cargo features
//!
//! | Feature | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | `Serialize` on snapshots, alerts, and run summaries.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hr_replay::{NoopObserver, ReplayBuilder, StopSignal};
//!
//! let table = hr_ingest::load_table(Path::new("shift.csv"))?;
//! let mut replay = ReplayBuilder::new(SimulationConfig::default(), &table).build()?;
//! let outcome = replay.run(&mut NoopObserver, &StopSignal::new());
//! ```

pub mod aggregator;
pub mod builder;
pub mod control;
pub mod error;
pub mod observer;
pub mod player;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use aggregator::Aggregator;
pub use builder::{Replay, ReplayBuilder, replay_table};
pub use control::{ContinueWhile, PlaybackControl, StopSignal, Unpaced};
pub use error::{ReplayError, ReplayResult};
pub use observer::{NoopObserver, ReplayObserver, UnderloadAlert};
pub use player::{Player, PlayerState, RunOutcome, RunSummary};
pub use snapshot::{LeaderboardEntry, Snapshot, Totals};
