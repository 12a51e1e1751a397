use rusqlite::{types::ToSql, Connection, OptionalExtension, Statement};
use std::path::Path;
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::error::{DatabaseError, Result};
use crate::sql::{self, ID_COLUMN};
use crate::value::{Record, Row, Value};

/// Generic data access over one SQLite connection.
///
/// The connection is opened by the constructor and closed when the value is
/// dropped. Every operation is a single autocommitting statement; nothing is
/// retried and no error is handled locally.
///
/// `Database` is `Send` but not `Sync`. Callers sharing one instance across
/// threads serialize access themselves, e.g. behind a `Mutex`.
#[derive(Debug)]
pub struct Database {
    connection: Connection,
    path: Option<String>,
}

impl Database {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_display = path.display().to_string();
        info!(path = %path_display, "opening sqlite database");
        let connection = Connection::open(path).map_err(|source| DatabaseError::Connection {
            path: path_display.clone(),
            source,
        })?;
        Ok(Self {
            connection,
            path: Some(path_display),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().map_err(|source| DatabaseError::Connection {
                path: crate::config::IN_MEMORY_PATH.to_string(),
                source,
            })?;
        Ok(Self {
            connection,
            path: None,
        })
    }

    /// Open the database named by the `[db]` section of the configuration.
    pub fn from_config(config: &DbConfig) -> Result<Self> {
        Self::open(&config.path)
    }

    /// Path the connection was opened with; `None` for in-memory databases.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Run caller-supplied SQL without parameter binding and return the number
    /// of rows changed by the most recent INSERT, UPDATE or DELETE.
    ///
    /// Every statement in the text runs, in order. Rows returned by a statement
    /// (a `PRAGMA`, a `SELECT`) are discarded. The SQL text is used verbatim:
    /// the caller is responsible for its safety.
    pub fn execute(&self, statement: &str) -> Result<usize> {
        debug!(sql = statement, "execute");
        self.connection
            .execute_batch(statement)
            .map_err(|source| DatabaseError::query(statement, source))?;
        Ok(self.connection.changes() as usize)
    }

    /// Run a script of one or more statements, e.g. schema setup.
    pub fn execute_batch(&self, script: &str) -> Result<()> {
        debug!(sql = script, "execute batch");
        self.connection
            .execute_batch(script)
            .map_err(|source| DatabaseError::query(script, source))
    }

    /// Run caller-supplied SQL and collect every result row, in result order.
    pub fn fetch(&self, statement: &str) -> Result<Vec<Row>> {
        debug!(sql = statement, "fetch");
        let query_error = |source| DatabaseError::query(statement, source);
        let mut stmt = self.connection.prepare(statement).map_err(query_error)?;
        let columns = column_names(&stmt);
        let rows = stmt
            .query_map([], |row| collect_row(&columns, row))
            .map_err(query_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(query_error)
    }

    /// Insert `record` into `table` and return the new row's id.
    ///
    /// Columns follow the record's key order; each value is bound to a
    /// `:column` parameter.
    pub fn create(&self, table: &str, record: &Record) -> Result<i64> {
        let statement = sql::insert(table, record.keys())?;
        debug!(sql = %statement, "create");
        let names: Vec<String> = record.keys().map(sql::param_name).collect();
        let params: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(record.values())
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();
        self.connection
            .execute(&statement, params.as_slice())
            .map_err(|source| DatabaseError::query(&statement, source))?;
        Ok(self.connection.last_insert_rowid())
    }

    /// Fetch the row whose `id` column equals `id`.
    ///
    /// A missing row is reported as [`DatabaseError::NotFound`]; use
    /// [`Database::find`] when absence is routine.
    pub fn read(&self, table: &str, id: i64) -> Result<Row> {
        self.find(table, id)?.ok_or_else(|| DatabaseError::NotFound {
            table: table.to_string(),
            id,
        })
    }

    /// Like [`Database::read`], but a missing row is `Ok(None)`.
    pub fn find(&self, table: &str, id: i64) -> Result<Option<Row>> {
        let statement = sql::select_by_id(table)?;
        debug!(sql = %statement, id, "read");
        let query_error = |source| DatabaseError::query(&statement, source);
        let mut stmt = self.connection.prepare(&statement).map_err(query_error)?;
        let columns = column_names(&stmt);
        let row = stmt
            .query_row([id], |row| collect_row(&columns, row))
            .optional()
            .map_err(query_error)?;
        Ok(row)
    }

    /// Set every column in `record` on the row with the given `id`.
    ///
    /// An `id` key inside `record` is ignored: the row is always addressed, and
    /// its id left, by the `id` argument. Returns `false` when no row matched.
    /// An otherwise empty record changes nothing and reports whether the row
    /// exists.
    pub fn update(&self, table: &str, id: i64, record: &Record) -> Result<bool> {
        let columns: Vec<&str> = record.keys().filter(|key| *key != ID_COLUMN).collect();
        if columns.is_empty() {
            return self.exists(table, id);
        }

        let statement = sql::update_by_id(table, columns.iter().copied())?;
        debug!(sql = %statement, id, "update");
        let id_value = Value::Integer(id);
        let id_name = sql::param_name(ID_COLUMN);
        let names: Vec<(String, &Value)> = record
            .iter()
            .filter(|(key, _)| *key != ID_COLUMN)
            .map(|(key, value)| (sql::param_name(key), value))
            .collect();
        let mut params: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
            .collect();
        params.push((id_name.as_str(), &id_value as &dyn ToSql));

        let changed = self
            .connection
            .execute(&statement, params.as_slice())
            .map_err(|source| DatabaseError::query(&statement, source))?;
        Ok(changed > 0)
    }

    /// Delete the row with the given `id`; `false` when no row matched.
    pub fn delete(&self, table: &str, id: i64) -> Result<bool> {
        let statement = sql::delete_by_id(table)?;
        debug!(sql = %statement, id, "delete");
        let changed = self
            .connection
            .execute(&statement, [id])
            .map_err(|source| DatabaseError::query(&statement, source))?;
        Ok(changed > 0)
    }

    /// Number of rows in `table`.
    pub fn count(&self, table: &str) -> Result<i64> {
        let statement = sql::count(table)?;
        debug!(sql = %statement, "count");
        self.connection
            .query_row(&statement, [], |row| row.get(0))
            .map_err(|source| DatabaseError::query(&statement, source))
    }

    fn exists(&self, table: &str, id: i64) -> Result<bool> {
        let statement = sql::exists_by_id(table)?;
        debug!(sql = %statement, id, "exists");
        let found: Option<i64> = self
            .connection
            .query_row(&statement, [id], |row| row.get(0))
            .optional()
            .map_err(|source| DatabaseError::query(&statement, source))?;
        Ok(found.is_some())
    }
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

// Duplicate result column names collapse into one key; the last value wins.
fn collect_row(columns: &[String], row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let mut out = Row::new();
    for (index, name) in columns.iter().enumerate() {
        let value: Value = row.get(index)?;
        out.insert(name, value);
    }
    Ok(out)
}
