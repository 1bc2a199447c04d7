// ABOUTME: Error taxonomy for the export pipeline
// ABOUTME: Every failure is fatal; nothing is caught and recovered internally

use thiserror::Error;

use crate::source::ColumnType;

/// Failures that abort an export.
///
/// All three variants propagate unchanged out of `Exporter::export`; there is
/// no retry or partial-success reporting anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A source column declares a type with no SQLite mapping.
    #[error("unsupported source column type '{ty}' for {table}.{column}")]
    UnsupportedType {
        table: String,
        column: String,
        ty: ColumnType,
    },

    /// Any DDL/DML failure on the destination side (duplicate table,
    /// malformed bind, I/O error on the SQLite file).
    #[error("destination database error: {0}")]
    Destination(#[from] rusqlite::Error),

    /// Failure opening the source dump or reading a row from it.
    #[error("failed to read source database: {0}")]
    SourceRead(String),
}

impl From<anyhow::Error> for ExportError {
    fn from(err: anyhow::Error) -> Self {
        ExportError::SourceRead(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
