//! Tabular rows produced by diffs and hierarchy queries

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// A single cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Ordering used for `--order-by`
    ///
    /// Nulls compare as the empty string against text and as zero against
    /// integers; mixed text/int falls back to comparing rendered strings.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Null, Value::Int(b)) => 0i64.cmp(b),
            (Value::Int(a), Value::Null) => a.cmp(&0),
            (Value::Null, Value::Text(b)) => "".cmp(b.as_str()),
            (Value::Text(a), Value::Null) => a.as_str().cmp(""),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Value::Null, Value::Text)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// Column name -> cell, in insertion order
pub type Record = IndexMap<String, Value>;

/// Union of column names across rows, in first-seen order
pub fn columns(rows: &[Record]) -> Vec<String> {
    let mut seen: IndexMap<&str, ()> = IndexMap::new();
    for row in rows {
        for key in row.keys() {
            seen.entry(key.as_str()).or_insert(());
        }
    }
    seen.into_keys().map(str::to_string).collect()
}

/// Drop every column whose value is `Null` (or missing) in all rows
pub fn remove_empty_columns(rows: &mut [Record]) -> Vec<String> {
    let empty: Vec<String> = columns(rows)
        .into_iter()
        .filter(|column| {
            rows.iter()
                .all(|row| row.get(column).map_or(true, Value::is_null))
        })
        .collect();

    for row in rows.iter_mut() {
        for column in &empty {
            row.shift_remove(column);
        }
    }
    empty
}

#[derive(Debug, Error)]
#[error("unknown column '{column}' (available: {})", .available.join(", "))]
pub struct OrderError {
    pub column: String,
    pub available: Vec<String>,
}

/// Stable sort of rows by the named columns, in priority order
///
/// A column must appear in at least one row; rows without it sort as `Null`.
pub fn order_by(mut rows: Vec<Record>, by: &[String]) -> Result<Vec<Record>, OrderError> {
    let known = columns(&rows);
    if let Some(missing) = by.iter().find(|column| !known.contains(column)) {
        return Err(OrderError {
            column: missing.clone(),
            available: known,
        });
    }

    rows.sort_by(|a, b| {
        by.iter()
            .map(|column| cell(a, column).sort_cmp(cell(b, column)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    Ok(rows)
}

fn cell<'a>(row: &'a Record, column: &str) -> &'a Value {
    const NULL: &Value = &Value::Null;
    row.get(column).unwrap_or(NULL)
}
