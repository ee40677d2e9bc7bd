//! SELECT-only statement execution.
//!
//! The executor never returns an error to its caller: policy rejections and
//! storage faults are folded into a [`QueryResult`] with `success: false`.
//!
//! # Example
//!
//! ```
//! use groundwater_sql::{executor::QueryExecutor, store::SqliteStore};
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! store.execute_batch("CREATE TABLE t (a INTEGER); INSERT INTO t VALUES (7);").unwrap();
//! let executor = QueryExecutor::new(&store);
//!
//! let result = executor.execute("SELECT a FROM t;");
//! assert!(result.success);
//! assert_eq!(result.row_count(), 1);
//!
//! let rejected = executor.execute("DROP TABLE t;");
//! assert!(!rejected.success);
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::error_message, store::Store};

/// Message returned for statements that are not `SELECT`
pub const SELECT_ONLY_MESSAGE: &str = "Only SELECT queries are allowed.";

/// One result row keyed by column name in result order
pub type Row = IndexMap<String, Value>;

/// Outcome of executing a statement.
///
/// Serializes as `{"success": true, "data": [...], "columns": [...]}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data:    Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>
}

impl QueryResult {
    pub fn ok(columns: Vec<String>, data: Vec<Row>) -> Self {
        Self {
            success: true,
            data:    Some(data),
            columns: Some(columns),
            error:   None
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data:    None,
            columns: None,
            error:   Some(error.into())
        }
    }

    /// Number of returned rows, zero on failure
    pub fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

/// Whether `sql` starts with `SELECT`, ignoring case and leading whitespace
pub fn is_select(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}

/// Runs read-only statements against a store.
pub struct QueryExecutor<'a> {
    store: &'a dyn Store
}

impl<'a> QueryExecutor<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store
        }
    }

    pub fn execute(&self, sql: &str) -> QueryResult {
        if !is_select(sql) {
            warn!("Rejected non-SELECT statement");
            return QueryResult::failure(SELECT_ONLY_MESSAGE);
        }
        match self.store.query(sql) {
            Ok(rows) => {
                let data: Vec<Row> = rows
                    .rows
                    .into_iter()
                    .map(|values| rows.columns.iter().cloned().zip(values).collect())
                    .collect();
                debug!(rows = data.len(), "Query executed");
                QueryResult::ok(rows.columns, data)
            }
            Err(e) => {
                let message = error_message(&e);
                warn!("Query failed: {}", message);
                QueryResult::failure(message)
            }
        }
    }
}
