//! `hr-core` — foundational types for the haul-replay engine.
//!
//! This crate is a dependency of every other `hr-*` crate.  It has no `hr-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `HaulUnit`, `LoadUnit` (string ids with a `-` sentinel) |
//! | [`trip`]      | `TripRecord`, `Status`, `ClassifiedEvent`, `classify`   |
//! | [`config`]    | `SimulationConfig`, `PlaybackSpeed`                     |
//! | [`error`]     | `HrError`, `HrResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod trip;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{PlaybackSpeed, SimulationConfig};
pub use error::{HrError, HrResult};
pub use ids::{HaulUnit, LoadUnit};
pub use trip::{ClassifiedEvent, Status, TripRecord, classify};
