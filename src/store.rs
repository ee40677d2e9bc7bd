//! Storage collaborator.
//!
//! The pipeline talks to the database only through the [`Store`] trait:
//! ordered column introspection for a table, statement execution returning
//! column names plus row tuples, and a dry run used by the validator.
//! [`SqliteStore`] is the SQLite implementation backed by `rusqlite`.
//!
//! Connections are configured so a double-quoted name always refers to a
//! column: SQLite's fallback of treating unknown `"..."` as a string literal
//! is disabled. Statements must be single; a non-blank tail after the first
//! `;` is an error.
//!
//! # Example
//!
//! ```
//! use groundwater_sql::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! store
//!     .execute_batch("CREATE TABLE t (a INTEGER, b TEXT); INSERT INTO t VALUES (1, 'x');")
//!     .unwrap();
//!
//! assert_eq!(store.columns("t").unwrap(), vec!["a", "b"]);
//! let rows = store.query("SELECT a, b FROM t;").unwrap();
//! assert_eq!(rows.rows.len(), 1);
//! ```

use std::{
    path::Path,
    sync::{Mutex, MutexGuard}
};

use rusqlite::{Connection, OpenFlags, config::DbConfig, types::ValueRef};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult, storage_error},
    repair::has_trailing_statement
};

/// Result set of a statement: column names and row tuples in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows:    Vec<Vec<Value>>
}

/// Relational store used by the catalog, validator and executor.
pub trait Store: Send + Sync {
    /// Ordered column names of `table`. Unknown tables yield an empty list.
    fn columns(&self, table: &str) -> AppResult<Vec<String>>;

    /// Run a single statement and collect all rows.
    fn query(&self, sql: &str) -> AppResult<Rows>;

    /// Compile and start executing a statement without collecting results.
    fn dry_run(&self, sql: &str) -> AppResult<()> {
        self.query(sql).map(|_| ())
    }
}

/// SQLite store. The connection is guarded by a mutex so one store can be
/// shared by reference between pipeline stages.
pub struct SqliteStore {
    conn: Mutex<Connection>
}

impl SqliteStore {
    /// Open an existing database file read-only
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI
        )
        .map_err(storage_error)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> AppResult<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)
            .map_err(storage_error)?;
        Ok(Self {
            conn: Mutex::new(conn)
        })
    }

    /// Run a batch of statements (fixtures, local provisioning)
    pub fn execute_batch(&self, sql: &str) -> AppResult<()> {
        self.lock()?.execute_batch(sql).map_err(storage_error)
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::internal("SQLite connection lock poisoned"))
    }
}

impl Store for SqliteStore {
    fn columns(&self, table: &str) -> AppResult<Vec<String>> {
        let conn = self.lock()?;
        let sql = format!("PRAGMA table_info({});", quote_identifier(table));
        let mut stmt = conn.prepare(&sql).map_err(storage_error)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;
        Ok(names)
    }

    fn query(&self, sql: &str) -> AppResult<Rows> {
        let conn = self.lock()?;
        let mut stmt = prepare_single(&conn, sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut cursor = stmt.query([]).map_err(storage_error)?;
        let mut rows = Vec::new();
        while let Some(row) = cursor.next().map_err(storage_error)? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(to_json(row.get_ref(idx).map_err(storage_error)?));
            }
            rows.push(values);
        }
        Ok(Rows {
            columns,
            rows
        })
    }

    fn dry_run(&self, sql: &str) -> AppResult<()> {
        let conn = self.lock()?;
        let mut stmt = prepare_single(&conn, sql)?;
        let mut cursor = stmt.query([]).map_err(storage_error)?;
        cursor.next().map_err(storage_error)?;
        Ok(())
    }
}

fn prepare_single<'c>(conn: &'c Connection, sql: &str) -> AppResult<rusqlite::Statement<'c>> {
    if has_trailing_statement(sql) {
        return Err(storage_error(rusqlite::Error::MultipleStatement));
    }
    conn.prepare(sql).map_err(storage_error)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::from(bytes.to_vec())
    }
}
