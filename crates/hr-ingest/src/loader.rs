//! Table loaders.
//!
//! # CSV format
//!
//! The header row names the columns.  One row per trip; extra columns are
//! carried along and ignored by the normalizer.
//!
//! ```csv
//! OID,HaulModel,HaulingEq,LoadingEq,PayloadAct,CycleHour
//! 1,777D,HT101,EX05,95.2,06
//! 2,777D,HT104,EX02,84.7,06
//! 3,785C,HT201,EX05,130.4,07
//! ```
//!
//! Empty cells become [`RawValue::Null`].  Rows shorter than the header are
//! accepted; their missing trailing cells are null.  A repeated header keeps
//! its first column under the plain name; later copies become `Name.1`,
//! `Name.2`, and so on.
//!
//! # Excel format
//!
//! `.xlsx` workbooks are read from the first worksheet.  Row 1 is the header
//! (duplicates handled as for CSV, blank names become `Unnamed: <col>`).
//! Numeric cells stay numeric, empty and error cells are null, and anything
//! else is carried as text.
//!
//! # JSON format
//!
//! An array of flat objects.  Numbers stay numeric, strings stay text, and the
//! header is the union of keys across all rows.
//!
//! ```json
//! [{"OID": 1, "HaulModel": "777D", "HaulingEq": "HT101", "PayloadAct": 95.2}]
//! ```

use std::collections::HashSet;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use serde_json::Value;

use crate::{IngestError, IngestResult, RawRow, RawTable, RawValue};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a table from `path`, choosing the parser from the file extension
/// (`.csv`, `.json` or `.xlsx`, case-insensitive).
pub fn load_table(path: &Path) -> IngestResult<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv"  => load_table_csv(path),
        "json" => load_table_json(path),
        "xlsx" => load_table_xlsx(path),
        other  => Err(IngestError::UnsupportedFormat(other.to_owned())),
    }
}

/// Load a table from a CSV file.
pub fn load_table_csv(path: &Path) -> IngestResult<RawTable> {
    let file = std::fs::File::open(path)?;
    load_table_csv_reader(file)
}

/// Like [`load_table_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or reading uploads held in
/// memory.
pub fn load_table_csv_reader<R: Read>(reader: R) -> IngestResult<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = unique_headers(csv_reader.headers()?.iter().map(str::to_owned));
    let mut table = RawTable::new(columns.iter().cloned());

    for result in csv_reader.records() {
        let record = result?;
        let mut row = RawRow::new();
        for (column, cell) in columns.iter().zip(record.iter()) {
            row.insert(column.as_str(), text_cell(cell));
        }
        table.push(row);
    }

    log::debug!("loaded CSV table: {} columns, {} rows", table.columns().len(), table.len());
    Ok(table)
}

/// Load a table from a JSON file holding an array of objects.
pub fn load_table_json(path: &Path) -> IngestResult<RawTable> {
    let file = std::fs::File::open(path)?;
    load_table_json_reader(std::io::BufReader::new(file))
}

/// Like [`load_table_json`] but accepts any `Read` source.
pub fn load_table_json_reader<R: Read>(reader: R) -> IngestResult<RawTable> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(items) = value else {
        return Err(IngestError::Parse("expected a JSON array of row objects".to_owned()));
    };

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<RawRow> = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let Value::Object(object) = item else {
            return Err(IngestError::Parse(format!("row {i} is not a JSON object")));
        };
        let mut row = RawRow::new();
        for (key, value) in object {
            if !columns.contains(&key) {
                columns.push(key.clone());
            }
            row.insert(key, json_cell(value));
        }
        rows.push(row);
    }

    let mut table = RawTable::new(columns);
    for row in rows {
        table.push(row);
    }
    log::debug!("loaded JSON table: {} columns, {} rows", table.columns().len(), table.len());
    Ok(table)
}

/// Load a table from the first worksheet of an `.xlsx` workbook.
pub fn load_table_xlsx(path: &Path) -> IngestResult<RawTable> {
    let file = std::fs::File::open(path)?;
    load_table_xlsx_reader(std::io::BufReader::new(file))
}

/// Like [`load_table_xlsx`] but accepts any seekable source.
pub fn load_table_xlsx_reader<R: Read + Seek>(reader: R) -> IngestResult<RawTable> {
    let mut workbook = Xlsx::new(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::Parse("workbook has no worksheets".to_owned()))??;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Ok(RawTable::new(Vec::<String>::new()));
    };
    let columns = unique_headers(header.iter().enumerate().map(|(i, cell)| {
        let name = cell.to_string().trim().to_owned();
        if name.is_empty() { format!("Unnamed: {i}") } else { name }
    }));

    let mut table = RawTable::new(columns.iter().cloned());
    for cells in sheet_rows {
        let mut row = RawRow::new();
        for (column, cell) in columns.iter().zip(cells) {
            row.insert(column.as_str(), sheet_cell(cell));
        }
        table.push(row);
    }

    log::debug!("loaded worksheet: {} columns, {} rows", table.columns().len(), table.len());
    Ok(table)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn text_cell(cell: &str) -> RawValue {
    if cell.trim().is_empty() {
        RawValue::Null
    } else {
        RawValue::Text(cell.to_owned())
    }
}

fn sheet_cell(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Null,
        Data::Float(f)               => RawValue::Number(*f),
        Data::Int(i)                 => RawValue::Number(*i as f64),
        Data::String(s)              => text_cell(s),
        other                        => RawValue::Text(other.to_string()),
    }
}

/// Renames repeated header names to `Name.1`, `Name.2`, ... so every column
/// keeps its own cells and the first occurrence owns the plain name.
fn unique_headers(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let names: Vec<String> = names.into_iter().collect();
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in &names {
        if seen.insert(name.as_str()) {
            out.push(name.clone());
            continue;
        }
        let mut n = 1;
        let renamed = loop {
            let candidate = format!("{name}.{n}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(renamed.clone());
        out.push(renamed);
    }
    out
}

fn json_cell(value: Value) -> RawValue {
    match value {
        Value::Null      => RawValue::Null,
        Value::String(s) => text_cell(&s),
        Value::Number(n) => n.as_f64().map_or(RawValue::Null, RawValue::Number),
        other            => RawValue::Text(other.to_string()),
    }
}
