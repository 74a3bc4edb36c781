use std::fmt;
use std::io::Write;

use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TrackerError};

/// Name of the identifier column every catalog table starts with.
pub const ID_COLUMN: &str = "id";

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
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

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(r) => ValueRef::Real(*r),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Integer(i) => write!(f, "{i}"),
            // Debug keeps the fractional part: 40.0 rather than 40.
            Value::Real(r) => write!(f, "{r:?}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => {
                f.write_str("x'")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// Equality constraints, combined with AND.
///
/// Conditions keep insertion order so the generated filter is stable, though
/// the result does not depend on it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query {
    pub conditions: Vec<(String, Value)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_condition(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), value.into()));
        self
    }
}

/// Schema definition for the SQLite database
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }
    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: &str, data_type: DataType) -> Self {
        self.columns.push(ColumnDefinition {
            name: name.to_string(),
            data_type,
        });
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
}

/// Declared column affinity. SQLite treats these as advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    Integer,
    Text,
    Real,
}

impl DataType {
    pub fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
        }
    }
}

/// Column names plus every row of a table, in storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TableData {
    /// Header line, then one tab-separated line per row.
    pub fn write_tsv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.columns.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(out, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

/// SQLite store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: String,
    /// Tables ensured by [`SqliteStore::initialize_schema`]
    pub schema: Schema,
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema
    pub fn new(db_path: impl Into<String>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            schema,
        }
    }
}

/// Generic table access over a single database file.
///
/// Every operation opens its own connection, runs one statement and drops the
/// connection before returning, on error paths too. Writes autocommit.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    config: SqliteConfig,
}

impl SqliteStore {
    pub fn new(config: SqliteConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &str {
        &self.config.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.config.db_path)?)
    }

    /// Ensures every table of the configured schema, in declaration order.
    pub fn initialize_schema(&self) -> Result<()> {
        for table in &self.config.schema.tables {
            self.ensure_table(table)?;
        }
        Ok(())
    }

    /// `CREATE TABLE IF NOT EXISTS`. An existing table is left untouched even
    /// when its columns differ from `table`.
    pub fn ensure_table(&self, table: &TableDefinition) -> Result<()> {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.data_type.as_sql()))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(&table.name),
            columns.join(", ")
        );
        debug!(table = %table.name, %sql, "ensuring table");
        let conn = self.connect()?;
        conn.execute(&sql, [])?;
        Ok(())
    }

    /// True iff at least one row matches every condition of `query`.
    ///
    /// Condition columns must be declared on `table`; they end up in the SQL
    /// text while values are always bound.
    pub fn exists(&self, table: &TableDefinition, query: &Query) -> Result<bool> {
        let mut filters = Vec::with_capacity(query.conditions.len());
        for (column, _) in &query.conditions {
            if !table.has_column(column) {
                return Err(TrackerError::UnknownColumn {
                    table: table.name.clone(),
                    column: column.clone(),
                });
            }
            filters.push(format!("{} = ?", quote_ident(column)));
        }

        let mut sql = format!("SELECT COUNT(*) FROM {}", quote_ident(&table.name));
        if !filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filters.join(" AND "));
        }
        debug!(table = %table.name, %sql, "checking existence");

        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            &sql,
            params_from_iter(query.conditions.iter().map(|(_, v)| v)),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Appends one row. `values` follow the column order of `table` exactly.
    pub fn insert(&self, table: &TableDefinition, values: &[Value]) -> Result<()> {
        if values.len() != table.columns.len() {
            return Err(TrackerError::ArityMismatch {
                table: table.name.clone(),
                expected: table.columns.len(),
                actual: values.len(),
            });
        }

        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} VALUES ({})",
            quote_ident(&table.name),
            placeholders
        );
        debug!(table = %table.name, %sql, "inserting row");

        let conn = self.connect()?;
        conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(())
    }

    /// Every row of `table` with the column names the store reports.
    pub fn fetch_all(&self, table: &TableDefinition) -> Result<TableData> {
        let sql = format!("SELECT * FROM {}", quote_ident(&table.name));
        debug!(table = %table.name, %sql, "fetching table");

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(TableData { columns, rows })
    }

    /// One past the largest identifier in `table`, or 1 when it holds no rows.
    pub fn next_id(&self, table: &TableDefinition) -> Result<i64> {
        let sql = format!(
            "SELECT MAX({}) FROM {}",
            quote_ident(ID_COLUMN),
            quote_ident(&table.name)
        );
        debug!(table = %table.name, %sql, "reading max id");

        let conn = self.connect()?;
        let max: Option<i64> = conn.query_row(&sql, [], |row| row.get(0))?;
        match max {
            None => Ok(1),
            Some(id) => id.checked_add(1).ok_or_else(|| TrackerError::IdExhausted {
                table: table.name.clone(),
            }),
        }
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
