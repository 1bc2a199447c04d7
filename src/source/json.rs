// ABOUTME: SourceDatabase adapter over the mdb-json dump format
// ABOUTME: Parses the dump eagerly for schema, converts row values lazily per column type

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use base64::Engine as _;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{ExportError, Result};
use crate::source::{Column, ColumnType, Row, SourceDatabase, SourceTable, Value};

#[derive(Debug, Deserialize)]
struct DumpDocument {
    tables: Vec<DumpTable>,
}

#[derive(Debug, Deserialize)]
struct DumpTable {
    name: String,
    columns: Vec<DumpColumn>,
    #[serde(default)]
    rows: Vec<serde_json::Map<String, JsonValue>>,
}

#[derive(Debug, Deserialize)]
struct DumpColumn {
    name: String,
    #[serde(rename = "type")]
    ty: ColumnType,
}

/// An Access database read from an mdb-json dump file.
///
/// There is no Rust reader for the Jet binary format, so the shipped source
/// adapter consumes the JSON dump mdbtools produces (`mdb-json` plus
/// `mdb-schema` metadata): one document listing every table with its columns
/// (`{name, type}`) and its rows as objects keyed by column name. Binary
/// payloads are base64 strings, date-times are RFC 3339 or
/// `YYYY-MM-DD HH:MM:SS` text, money is exact decimal text.
///
/// The document is parsed up front; row values are converted lazily while
/// the copier iterates, so a malformed value surfaces as a `SourceRead`
/// error from the row iterator.
pub struct JsonDatabase {
    tables: HashMap<String, JsonTable>,
}

struct JsonTable {
    name: String,
    columns: Vec<Column>,
    rows: Vec<serde_json::Map<String, JsonValue>>,
}

impl JsonDatabase {
    /// Open and parse a dump file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Opening source dump: {}", path.display());

        let file = File::open(path)
            .with_context(|| format!("Failed to open source dump '{}'", path.display()))?;
        let document: DumpDocument = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse source dump '{}'", path.display()))?;

        Ok(Self::from_document(document))
    }

    /// Build a database from an already-parsed JSON document. Used by tests
    /// and by callers that receive the dump over a pipe.
    pub fn from_json(json: JsonValue) -> Result<Self> {
        let document: DumpDocument =
            serde_json::from_value(json).context("Failed to parse source dump document")?;
        Ok(Self::from_document(document))
    }

    fn from_document(document: DumpDocument) -> Self {
        let mut tables = HashMap::with_capacity(document.tables.len());
        for table in document.tables {
            let columns = table
                .columns
                .into_iter()
                .map(|c| Column {
                    name: c.name,
                    ty: c.ty,
                })
                .collect();
            tables.insert(
                table.name.clone(),
                JsonTable {
                    name: table.name,
                    columns,
                    rows: table.rows,
                },
            );
        }
        tracing::debug!("Source dump holds {} tables", tables.len());
        Self { tables }
    }
}

impl SourceDatabase for JsonDatabase {
    fn table_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn table(&self, name: &str) -> Result<Box<dyn SourceTable + '_>> {
        let table = self.tables.get(name).ok_or_else(|| {
            ExportError::SourceRead(format!("no such table '{name}' in source dump"))
        })?;
        Ok(Box::new(JsonTableCursor { table }))
    }
}

struct JsonTableCursor<'a> {
    table: &'a JsonTable,
}

impl SourceTable for JsonTableCursor<'_> {
    fn name(&self) -> &str {
        &self.table.name
    }

    fn columns(&self) -> &[Column] {
        &self.table.columns
    }

    fn rows(&mut self) -> Box<dyn Iterator<Item = Result<Row>> + '_> {
        let table = self.table;
        Box::new(table.rows.iter().map(move |raw| convert_row(table, raw)))
    }
}

fn convert_row(table: &JsonTable, raw: &serde_json::Map<String, JsonValue>) -> Result<Row> {
    let mut row = Row::with_capacity(table.columns.len());
    for column in &table.columns {
        let value = match raw.get(&column.name) {
            None | Some(JsonValue::Null) => Value::Null,
            Some(json) => convert_value(column, json).map_err(|err| {
                ExportError::SourceRead(format!("table '{}': {err:#}", table.name))
            })?,
        };
        row.insert(column.name.clone(), value);
    }
    Ok(row)
}

/// Convert one JSON value per the column's declared type tag.
fn convert_value(column: &Column, json: &JsonValue) -> anyhow::Result<Value> {
    use ColumnType::*;

    let value = match column.ty {
        Binary | Ole => {
            let text = json
                .as_str()
                .with_context(|| mismatch(column, "a base64 string", json))?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(text)
                .with_context(|| format!("column '{}' holds invalid base64", column.name))?;
            Value::Bytes(bytes)
        }
        Boolean => Value::Bool(
            json.as_bool()
                .with_context(|| mismatch(column, "a boolean", json))?,
        ),
        Byte | Int | Long => Value::Int(
            json.as_i64()
                .with_context(|| mismatch(column, "an integer", json))?,
        ),
        ShortDateTime => {
            let text = json
                .as_str()
                .with_context(|| mismatch(column, "a date-time string", json))?;
            Value::DateTime(parse_datetime(text).with_context(|| {
                format!("column '{}' holds an unparseable date-time", column.name)
            })?)
        }
        Double | Float | Numeric => Value::Float(
            json.as_f64()
                .with_context(|| mismatch(column, "a number", json))?,
        ),
        Text | Guid | Memo => Value::Text(
            json.as_str()
                .with_context(|| mismatch(column, "a string", json))?
                .to_string(),
        ),
        // Money stays text end to end; a bare number in the dump is rendered
        // to its literal digits rather than parsed as a float.
        Money => match json {
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Number(n) => Value::Text(n.to_string()),
            other => anyhow::bail!(mismatch(column, "a decimal string", other)),
        },
        Complex | Unknown => {
            anyhow::bail!(
                "column '{}' has type '{}' which cannot be exported",
                column.name,
                column.ty
            )
        }
    };

    Ok(value)
}

fn mismatch(column: &Column, expected: &str, got: &JsonValue) -> String {
    format!(
        "column '{}' ({}) expected {expected}, got {got}",
        column.name, column.ty
    )
}

fn parse_datetime(text: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        // mdbtools' default date rendering
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%m/%d/%y %H:%M:%S"))
        .with_context(|| format!("unrecognized date-time '{text}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_db() -> JsonDatabase {
        JsonDatabase::from_json(json!({
            "tables": [
                {
                    "name": "People",
                    "columns": [
                        {"name": "Name", "type": "text"},
                        {"name": "Age", "type": "long"},
                        {"name": "Balance", "type": "money"},
                        {"name": "Active", "type": "boolean"}
                    ],
                    "rows": [
                        {"Name": "Ann", "Age": 30, "Balance": "100.00", "Active": true},
                        {"Name": "Bo", "Balance": "0.00", "Active": false}
                    ]
                },
                {
                    "name": "Attachments",
                    "columns": [
                        {"name": "Payload", "type": "ole"}
                    ],
                    "rows": [
                        {"Payload": "aGVsbG8="}
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_table_names_sorted() {
        let db = sample_db();
        assert_eq!(db.table_names().unwrap(), vec!["Attachments", "People"]);
    }

    #[test]
    fn test_missing_table_is_source_read_error() {
        let db = sample_db();
        let err = db.table("Nope").err().unwrap();
        assert!(matches!(err, ExportError::SourceRead(_)));
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn test_columns_keep_declared_order() {
        let db = sample_db();
        let table = db.table("People").unwrap();
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Age", "Balance", "Active"]);
    }

    #[test]
    fn test_rows_convert_per_column_type() {
        let db = sample_db();
        let mut table = db.table("People").unwrap();
        let rows: Vec<Row> = table.rows().collect::<Result<_>>().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], Value::Text("Ann".to_string()));
        assert_eq!(rows[0]["Age"], Value::Int(30));
        assert_eq!(rows[0]["Balance"], Value::Text("100.00".to_string()));
        assert_eq!(rows[0]["Active"], Value::Bool(true));

        // Absent key reads as NULL
        assert_eq!(rows[1]["Age"], Value::Null);
        assert_eq!(rows[1]["Active"], Value::Bool(false));
    }

    #[test]
    fn test_binary_columns_decode_base64() {
        let db = sample_db();
        let mut table = db.table("Attachments").unwrap();
        let rows: Vec<Row> = table.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows[0]["Payload"], Value::Bytes(b"hello".to_vec()));
    }

    #[test]
    fn test_money_number_renders_to_literal_text() {
        let db = JsonDatabase::from_json(json!({
            "tables": [{
                "name": "t",
                "columns": [{"name": "m", "type": "money"}],
                "rows": [{"m": 12.50}]
            }]
        }))
        .unwrap();

        let mut table = db.table("t").unwrap();
        let rows: Vec<Row> = table.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows[0]["m"], Value::Text("12.5".to_string()));
    }

    #[test]
    fn test_type_mismatch_surfaces_from_row_iterator() {
        let db = JsonDatabase::from_json(json!({
            "tables": [{
                "name": "t",
                "columns": [{"name": "n", "type": "long"}],
                "rows": [{"n": "thirty"}]
            }]
        }))
        .unwrap();

        let mut table = db.table("t").unwrap();
        let err = table.rows().next().unwrap().err().unwrap();
        assert!(matches!(err, ExportError::SourceRead(_)));
        assert!(err.to_string().contains("expected an integer"));
    }

    #[test]
    fn test_datetime_formats() {
        for (text, expected) in [
            ("2008-01-02 10:30:00", "2008-01-02 10:30:00"),
            ("2008-01-02T10:30:00Z", "2008-01-02 10:30:00"),
            ("01/02/08 10:30:00", "2008-01-02 10:30:00"),
        ] {
            let dt = parse_datetime(text).unwrap();
            assert_eq!(
                dt.format(crate::source::value::SQLITE_DATETIME_FORMAT)
                    .to_string(),
                expected,
                "input {text}"
            );
        }

        assert!(parse_datetime("soon").is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = JsonDatabase::open("/nonexistent/dump.json").err().unwrap();
        assert!(err.to_string().contains("Failed to open source dump"));
    }

    #[test]
    fn test_open_malformed_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonDatabase::open(&path).err().unwrap();
        assert!(matches!(err, ExportError::SourceRead(_)));
        assert!(err.to_string().contains("Failed to parse source dump"));
    }
}
