//! Core types for the database layer.
//!
//! SQLite columns are dynamically typed per row, so results are modeled
//! as ordered (column, tagged value) pairs rather than fixed structs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rusqlite::types::ValueRef;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A single dynamically-typed SQLite value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Raw bytes; serialized as base64 text since JSON has no byte type.
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_unit(),
            SqlValue::Integer(i) => serializer.serialize_i64(*i),
            SqlValue::Real(f) => serializer.serialize_f64(*f),
            SqlValue::Text(t) => serializer.serialize_str(t),
            SqlValue::Blob(b) => serializer.serialize_str(&BASE64.encode(b)),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(t) => write!(f, "{}", t),
            SqlValue::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

/// One result row: (column name, value) pairs in select-list order.
///
/// Serializes as a JSON object preserving that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow(pub Vec<(String, SqlValue)>);

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl ResultRow {
    /// Look up a value by column name (first match wins).
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

/// One `PRAGMA table_info` record, passed through verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub notnull: i64,
    pub dflt_value: Option<String>,
    pub pk: i64,
}

/// Size and table-count statistics for a database file.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub page_count: i64,
    pub page_size: i64,
    pub approximate_size_mb: f64,
    pub table_count: i64,
}

impl DatabaseInfo {
    /// page_count * page_size in mebibytes, rounded to two decimals.
    pub fn approximate_size_mb(page_count: i64, page_size: i64) -> f64 {
        let bytes = (page_count as f64) * (page_size as f64);
        (bytes / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}
