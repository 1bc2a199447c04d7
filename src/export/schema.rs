// ABOUTME: Schema translation from Access column types to SQLite CREATE TABLE DDL
// ABOUTME: Holds the single type-mapping function shared with the data copier

use rusqlite::Connection;

use crate::error::{ExportError, Result};
use crate::source::{ColumnType, SourceTable};

/// Map a source column type to its SQLite column type.
///
/// This is the one source of truth for the schema translation; the copier's
/// coercion policy keys off the same tags so the two cannot drift. `None`
/// means the tag has no SQLite representation and the export must fail.
pub fn sqlite_type(ty: ColumnType) -> Option<&'static str> {
    use ColumnType::*;

    match ty {
        Binary | Ole => Some("BLOB"),
        Boolean | Byte | Int | Long => Some("INTEGER"),
        ShortDateTime => Some("DATETIME"),
        Double | Float | Numeric => Some("DOUBLE"),
        Text | Guid | Memo => Some("TEXT"),
        // Money can't be floating point; exact decimal text is the only
        // representation SQLite stores losslessly.
        Money => Some("TEXT"),
        Complex | Unknown => None,
    }
}

/// Quote an identifier for SQLite DDL/DML, doubling embedded quotes.
///
/// Deliberately minimal: it does not defend against every pathological name
/// the Jet grammar allows, only the quoting SQLite's identifier syntax needs.
pub fn escape_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build the CREATE TABLE statement for one source table: every column in
/// declared order, mapped type, no constraints carried over.
pub fn create_table_sql(table: &dyn SourceTable) -> Result<String> {
    let mut columns = Vec::with_capacity(table.columns().len());
    for column in table.columns() {
        let ty = sqlite_type(column.ty).ok_or_else(|| ExportError::UnsupportedType {
            table: table.name().to_string(),
            column: column.name.clone(),
            ty: column.ty,
        })?;
        columns.push(format!("{} {}", escape_identifier(&column.name), ty));
    }

    Ok(format!(
        "CREATE TABLE {} ({})",
        escape_identifier(table.name()),
        columns.join(", ")
    ))
}

/// Create the SQLite table for one source table, executing the DDL
/// immediately.
pub fn create_table(dest: &Connection, table: &dyn SourceTable) -> Result<()> {
    let sql = create_table_sql(table)?;
    tracing::debug!("Creating table: {}", sql);
    dest.execute(&sql, [])?;
    Ok(())
}
