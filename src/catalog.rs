//! Schema catalog for the assessment table.
//!
//! The catalog is a read-only snapshot taken once per generator: the ordered
//! column names of the table and a bounded sample of distinct values for the
//! two identifier columns (state and district). The samples drive location
//! matching in the rule-based generator.
//!
//! # Example
//!
//! ```
//! use groundwater_sql::catalog::SchemaCatalog;
//!
//! let catalog = SchemaCatalog::from_parts(
//!     "facts_assessment",
//!     vec!["STATE - 1_level_1".into(), "Rainfall (mm) - Total".into()],
//!     vec!["TAMIL NADU".into()],
//!     vec!["CHENNAI".into()]
//! );
//!
//! assert_eq!(catalog.columns_matching(&["RAINFALL"]), vec!["\"Rainfall (mm) - Total\""]);
//! assert!(catalog.to_summary().contains("TAMIL NADU"));
//! ```

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    columns::{DISTRICT_COLUMN, SAMPLE_LIMIT, STATE_COLUMN, quote},
    error::error_message,
    store::Store
};

/// Read-only snapshot of the table schema and identifier samples.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaCatalog {
    /// Table name used in generated statements
    pub table:     String,
    /// Column names in table order
    pub columns:   Vec<String>,
    /// Sampled distinct state values
    pub states:    Vec<String>,
    /// Sampled distinct district values
    pub districts: Vec<String>
}

impl SchemaCatalog {
    /// Introspect `table` through the store.
    ///
    /// Never fails: a failed introspection yields an empty column list and a
    /// missing identifier column yields an empty sample for that column.
    pub fn load(store: &dyn Store, table: &str) -> Self {
        let columns = store.columns(table).unwrap_or_else(|e| {
            warn!("Failed to read columns of {}: {}", table, error_message(&e));
            Vec::new()
        });
        let sample = |column: &str| {
            if columns.iter().any(|c| c == column) {
                sample_values(store, table, column)
            } else {
                Vec::new()
            }
        };
        let states = sample(STATE_COLUMN);
        let districts = sample(DISTRICT_COLUMN);
        debug!(
            columns = columns.len(),
            states = states.len(),
            districts = districts.len(),
            "Loaded schema catalog for {}",
            table
        );
        Self {
            table: table.to_string(),
            columns,
            states,
            districts
        }
    }

    pub fn from_parts(
        table: impl Into<String>,
        columns: Vec<String>,
        states: Vec<String>,
        districts: Vec<String>
    ) -> Self {
        Self {
            table: table.into(),
            columns,
            states,
            districts
        }
    }

    /// Quoted columns whose uppercase name contains any of `needles`, in
    /// table order
    pub fn columns_matching(&self, needles: &[&str]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| {
                let upper = col.to_uppercase();
                needles.iter().any(|n| upper.contains(n))
            })
            .map(|col| quote(col))
            .collect()
    }

    /// Get summary of the catalog for prompts and display
    pub fn to_summary(&self) -> String {
        let mut summary = format!("Table: {}\n", self.table);
        summary.push_str("Columns:\n");
        for col in &self.columns {
            summary.push_str(&format!("  - \"{}\"\n", col));
        }
        if !self.states.is_empty() {
            summary.push_str(&format!("Sample states: {}\n", self.states.join(", ")));
        }
        if !self.districts.is_empty() {
            summary.push_str(&format!(
                "Sample districts: {}\n",
                self.districts.join(", ")
            ));
        }
        summary
    }
}

fn sample_values(store: &dyn Store, table: &str, column: &str) -> Vec<String> {
    let sql = format!(
        "SELECT DISTINCT {col} FROM {table} WHERE {col} IS NOT NULL LIMIT {limit};",
        col = quote(column),
        table = table,
        limit = SAMPLE_LIMIT
    );
    match store.query(&sql) {
        Ok(rows) => rows
            .rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter_map(|value| match value {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string())
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Err(e) => {
            warn!("Failed to sample distinct values for {}: {}", column, error_message(&e));
            Vec::new()
        }
    }
}
