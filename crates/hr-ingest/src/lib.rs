//! `hr-ingest` — raw table loading and record normalization.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`table`]     | `RawValue`, `RawRow`, `RawTable`                          |
//! | [`schema`]    | `Schema` (column names for each role)                     |
//! | [`loader`]    | `load_table` and the CSV / JSON / xlsx loaders             |
//! | [`normalize`] | `Normalizer`, `Normalized`, `NormalizeReport`, `OrderedBy` |
//! | [`error`]     | `IngestError`, `IngestResult<T>`                          |
//!
//! # Pipeline (summary)
//!
//! ```text
//! RawTable ─ schema check ─▶ model filter ─▶ order (OID › CycleHour › input)
//!          ─▶ payload coercion (drop non-numeric) ─▶ Vec<TripRecord>
//! ```
//!
//! Normalization is pure: the same table and config always yield the same
//! record sequence.

pub mod error;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod table;


pub use error::{IngestError, IngestResult};
pub use loader::{
    load_table, load_table_csv, load_table_csv_reader, load_table_json, load_table_json_reader,
    load_table_xlsx, load_table_xlsx_reader,
};
pub use normalize::{NormalizeReport, Normalized, Normalizer, OrderedBy};
pub use schema::Schema;
pub use table::{RawRow, RawTable, RawValue};
