// ABOUTME: Dynamically-typed source values and their SQLite representations
// ABOUTME: Sum type covering every runtime value an Access row can yield

use chrono::NaiveDateTime;

/// SQLite's text convention for date-time columns.
pub const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single value read from a source row.
///
/// The variant is determined by the column's declared type tag at the source
/// boundary; the copier coerces it deterministically when binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical text rendering, used when binding money columns.
    ///
    /// Text values pass through verbatim so exact decimal strings like
    /// "12.50" survive without a float round-trip.
    pub fn canonical_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => i64::from(*b).to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            Value::DateTime(dt) => dt.format(SQLITE_DATETIME_FORMAT).to_string(),
        }
    }

    /// Default mapping onto SQLite storage classes, used for every column
    /// the copier applies no special coercion to.
    pub fn to_sqlite(&self) -> rusqlite::types::Value {
        use rusqlite::types::Value as Sql;

        match self {
            Value::Null => Sql::Null,
            // rusqlite can bind booleans itself, but the 1/0 convention is
            // part of this tool's output contract, so it stays explicit.
            Value::Bool(b) => Sql::Integer(i64::from(*b)),
            Value::Int(i) => Sql::Integer(*i),
            Value::Float(f) => Sql::Real(*f),
            Value::Text(s) => Sql::Text(s.clone()),
            Value::Bytes(b) => Sql::Blob(b.clone()),
            Value::DateTime(dt) => Sql::Text(dt.format(SQLITE_DATETIME_FORMAT).to_string()),
        }
    }
}
