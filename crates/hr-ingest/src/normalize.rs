//! Record Normalizer: raw table → ordered, typed [`TripRecord`] sequence.
//!
//! # Steps
//!
//! 1. **Schema**: required columns must be in the header
//!    ([`IngestError::MissingColumn`] otherwise).
//! 2. **Filter**: keep rows whose model cell contains `model_filter`,
//!    case-insensitively.  Null model cells never match.
//! 3. **Order**: stable ascending sort by the ordering key if the column
//!    exists, else by the fallback key if that column exists, else input
//!    order.  Key columns compare numerically when every present value is
//!    numeric and lexically otherwise; missing keys sort last.
//! 4. **Coerce**: rows whose payload is not a finite number are dropped and
//!    counted in [`NormalizeReport::dropped_payload`].
//! 5. **Project**: survivors get `sequence_index` = position in the output.
//!
//! An empty result is [`IngestError::EmptyResult`].

use std::cmp::Ordering;
use std::fmt;

use hr_core::{HaulUnit, LoadUnit, SimulationConfig, TripRecord};

use crate::{IngestError, IngestResult, RawRow, RawTable, Schema};

// ── Report types ──────────────────────────────────────────────────────────────

/// Which column decided playback order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OrderedBy {
    OperationId,
    CycleTime,
    InputOrder,
}

impl fmt::Display for OrderedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            OrderedBy::OperationId => "operation id",
            OrderedBy::CycleTime   => "cycle time",
            OrderedBy::InputOrder  => "input order",
        })
    }
}

/// Data-quality counters from one normalization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Rows in the input table.
    pub input_rows:      usize,
    /// Rows whose model did not match the filter.
    pub filtered_out:    usize,
    /// Matching rows dropped because the payload was not a finite number.
    pub dropped_payload: usize,
    pub ordered_by:      OrderedBy,
}

/// Output of [`Normalizer::normalize`].
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub records: Vec<TripRecord>,
    pub report:  NormalizeReport,
}

// ── Normalizer ────────────────────────────────────────────────────────────────

/// Stateless normalizer bound to a column [`Schema`].
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    schema: Schema,
}

impl Normalizer {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Filter, order, coerce and project `table` for playback.
    ///
    /// Only `config.model_filter` is read; thresholds play no part here.
    pub fn normalize(
        &self,
        table:  &RawTable,
        config: &SimulationConfig,
    ) -> IngestResult<Normalized> {
        let schema = &self.schema;
        schema.check(table)?;

        // ── Filter ────────────────────────────────────────────────────────
        let needle = config.model_filter.to_lowercase();
        let mut kept: Vec<(usize, &RawRow)> = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.get(&schema.model)
                    .as_text()
                    .is_some_and(|model| model.to_lowercase().contains(&needle))
            })
            .collect();
        let filtered_out = table.len() - kept.len();

        // ── Order ─────────────────────────────────────────────────────────
        let ordered_by = if table.has_column(&schema.order_key) {
            sort_by_column(&mut kept, &schema.order_key);
            OrderedBy::OperationId
        } else if table.has_column(&schema.fallback_order_key) {
            sort_by_column(&mut kept, &schema.fallback_order_key);
            OrderedBy::CycleTime
        } else {
            OrderedBy::InputOrder
        };
        log::debug!("ordering {} matching rows by {ordered_by}", kept.len());

        // ── Coerce + project ──────────────────────────────────────────────
        let mut records: Vec<TripRecord> = Vec::with_capacity(kept.len());
        let mut dropped_payload = 0;

        for (source_row, row) in kept {
            let Some(payload) = row.get(&schema.payload).to_number() else {
                log::debug!(
                    "row {source_row}: dropping non-numeric payload {:?}",
                    row.get(&schema.payload)
                );
                dropped_payload += 1;
                continue;
            };
            records.push(TripRecord {
                sequence_index: records.len(),
                source_row,
                haul_unit: HaulUnit::from_raw(row.get(&schema.haul_unit).as_text().as_deref()),
                load_unit: LoadUnit::from_raw(row.get(&schema.load_unit).as_text().as_deref()),
                payload,
            });
        }

        if records.is_empty() {
            return Err(IngestError::EmptyResult { model_filter: config.model_filter.clone() });
        }

        let report = NormalizeReport {
            input_rows: table.len(),
            filtered_out,
            dropped_payload,
            ordered_by,
        };
        log::info!(
            "normalized {} of {} rows for model {:?} ({} filtered out, {} bad payloads)",
            records.len(),
            report.input_rows,
            config.model_filter,
            report.filtered_out,
            report.dropped_payload,
        );
        Ok(Normalized { records, report })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Stable ascending sort of `rows` by `column`.
fn sort_by_column(rows: &mut [(usize, &RawRow)], column: &str) {
    let numeric = rows
        .iter()
        .map(|(_, row)| row.get(column))
        .filter(|v| !v.is_null())
        .all(|v| v.to_number().is_some());

    if numeric {
        rows.sort_by(|(_, a), (_, b)| {
            missing_last(a.get(column).to_number(), b.get(column).to_number(), f64::total_cmp)
        });
    } else {
        rows.sort_by(|(_, a), (_, b)| {
            missing_last(a.get(column).as_text(), b.get(column).as_text(), Ord::cmp)
        });
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None)    => Ordering::Less,
        (None, Some(_))    => Ordering::Greater,
        (None, None)       => Ordering::Equal,
    }
}
