//! Untyped input table.
//!
//! A [`RawTable`] is what the loaders produce and what the normalizer
//! consumes: a header (the schema) plus rows of loosely typed cells.  Nothing
//! is validated here; the normalizer decides what a cell means.

use std::borrow::Cow;
use std::collections::HashMap;

// ── RawValue ──────────────────────────────────────────────────────────────────

/// One cell of the input table.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum RawValue {
    /// Empty cell or JSON `null`.
    #[default]
    Null,
    Text(String),
    Number(f64),
}

impl RawValue {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// String form of the cell; `None` for nulls.
    ///
    /// Integral numbers render without a fractional part so that a numeric
    /// model code `777` still matches the filter `"777"`.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            RawValue::Number(n) => Some(Cow::Owned(format_number(*n))),
        }
    }

    /// Numeric coercion.  Returns `None` for nulls, unparseable text, and
    /// non-finite values.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            RawValue::Null => return None,
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawValue::Null, Into::into)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ── RawRow ────────────────────────────────────────────────────────────────────

/// Field bag for one input row, keyed by column name.
///
/// Columns absent from the row read as [`RawValue::Null`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Cell for `column`; `&RawValue::Null` if absent.
    pub fn get(&self, column: &str) -> &RawValue {
        static NULL: RawValue = RawValue::Null;
        self.fields.get(column).unwrap_or(&NULL)
    }
}

// ── RawTable ──────────────────────────────────────────────────────────────────

/// Header plus rows, in the order they were read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows:    Vec<RawRow>,
}

impl RawTable {
    /// Create an empty table with the given header.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows:    Vec::new(),
        }
    }

    pub fn push(&mut self, row: RawRow) {
        self.rows.push(row);
    }

    /// Builder-style [`push`][Self::push].
    pub fn with_row(mut self, row: RawRow) -> Self {
        self.push(row);
        self
    }

    /// Whether `column` is part of the header.  Case-sensitive.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
