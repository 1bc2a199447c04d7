// ABOUTME: Source database boundary: schema types and traits for the Access side
// ABOUTME: Exposes tables as ordered column metadata plus a forward-only row iterator

pub mod json;
pub mod value;

pub use value::Value;

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::Result;

/// Column type tags as declared in an Access (Jet) schema.
///
/// This is the closed enumeration the type-mapping and coercion layer is
/// defined over. Tags outside it (complex/attachment columns, anything a
/// newer Jet version invents) deserialize as `Unknown` and have no SQLite
/// mapping, which fails the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ColumnType {
    Binary,
    Ole,
    Boolean,
    Byte,
    Int,
    Long,
    ShortDateTime,
    Double,
    Float,
    Numeric,
    Text,
    Guid,
    Memo,
    Money,
    Complex,
    Unknown,
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "binary" => ColumnType::Binary,
            "ole" => ColumnType::Ole,
            "boolean" => ColumnType::Boolean,
            "byte" => ColumnType::Byte,
            "int" => ColumnType::Int,
            "long" => ColumnType::Long,
            "short_date_time" => ColumnType::ShortDateTime,
            "double" => ColumnType::Double,
            "float" => ColumnType::Float,
            "numeric" => ColumnType::Numeric,
            "text" => ColumnType::Text,
            "guid" => ColumnType::Guid,
            "memo" => ColumnType::Memo,
            "money" => ColumnType::Money,
            "complex" => ColumnType::Complex,
            _ => ColumnType::Unknown,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ColumnType::Binary => "binary",
            ColumnType::Ole => "ole",
            ColumnType::Boolean => "boolean",
            ColumnType::Byte => "byte",
            ColumnType::Int => "int",
            ColumnType::Long => "long",
            ColumnType::ShortDateTime => "short_date_time",
            ColumnType::Double => "double",
            ColumnType::Float => "float",
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Guid => "guid",
            ColumnType::Memo => "memo",
            ColumnType::Money => "money",
            ColumnType::Complex => "complex",
            ColumnType::Unknown => "unknown",
        };
        f.write_str(tag)
    }
}

/// One column of a source table: name plus declared type tag.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

/// One source row: column name to value. A missing key reads as NULL.
pub type Row = HashMap<String, Value>;

/// An opened source database.
///
/// The caller opens and closes the underlying handle; the exporter only
/// reads through it for the duration of one `export` call.
pub trait SourceDatabase {
    /// All table names, lexicographically sorted so export order is
    /// deterministic.
    fn table_names(&self) -> Result<Vec<String>>;

    /// Look up one table by name.
    fn table(&self, name: &str) -> Result<Box<dyn SourceTable + '_>>;
}

/// One table of the source database.
pub trait SourceTable {
    fn name(&self) -> &str;

    /// Columns in declared order. The CREATE TABLE and INSERT statements
    /// both follow this order.
    fn columns(&self) -> &[Column];

    /// Lazy, forward-only row sequence. The copier consumes it exactly once.
    fn rows(&mut self) -> Box<dyn Iterator<Item = Result<Row>> + '_>;
}
