// ABOUTME: Row copy into SQLite: one prepared INSERT per table, one execute per row
// ABOUTME: Applies the per-type value coercions (money as text, boolean as 0/1)

use rusqlite::{params_from_iter, Connection};

use crate::error::Result;
use crate::export::schema::escape_identifier;
use crate::source::{Column, ColumnType, SourceTable, Value};

/// Build the parameterized INSERT statement for one table, columns in the
/// same declared order the CREATE TABLE used.
fn insert_sql(name: &str, columns: &[Column]) -> String {
    let column_list: Vec<String> = columns
        .iter()
        .map(|c| escape_identifier(&c.name))
        .collect();
    let placeholders = vec!["?"; columns.len()].join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        escape_identifier(name),
        column_list.join(", "),
        placeholders
    )
}

/// Coerce one source value into its SQLite bind value for a column of the
/// given declared type.
///
/// NULL binds NULL with no type-specific handling. Money always binds the
/// canonical text, never a numeric, so decimal strings survive exactly.
/// Booleans bind 1/0. Everything else takes the value's natural storage
/// class.
fn coerce(ty: ColumnType, value: &Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;

    match (ty, value) {
        (_, Value::Null) => Sql::Null,
        (ColumnType::Money, value) => Sql::Text(value.canonical_text()),
        (ColumnType::Boolean, Value::Bool(b)) => Sql::Integer(i64::from(*b)),
        (_, value) => value.to_sqlite(),
    }
}

/// Copy every row of `table` into its already-created destination table.
///
/// Rows are bound and executed one at a time; the first prepare, bind, or
/// execute failure aborts the table and propagates.
pub fn populate_table(dest: &Connection, table: &mut dyn SourceTable) -> Result<()> {
    let name = table.name().to_string();
    let columns = table.columns().to_vec();

    let sql = insert_sql(&name, &columns);
    tracing::debug!("Preparing insert: {}", sql);
    let mut stmt = dest.prepare(&sql)?;

    let mut copied = 0u64;
    for row in table.rows() {
        let row = row?;
        let binds = columns.iter().map(|column| {
            let value = row.get(&column.name).unwrap_or(&Value::Null);
            coerce(column.ty, value)
        });
        stmt.execute(params_from_iter(binds))?;
        copied += 1;
    }

    tracing::info!("Copied {} rows into '{}'", copied, name);
    Ok(())
}
