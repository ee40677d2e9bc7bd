//! Candidate SQL validation.
//!
//! The validator is deliberately conservative: a handful of string checks
//! tuned to the defects text-to-SQL models produce on this dataset, followed
//! by a dry run against the store. Correct SQL of an unusual shape may be
//! rejected; the pipeline then falls back to the rule-based generator.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    columns::{IDENTIFIER_COLUMNS, UNQUOTED_WATCH_LIST},
    error::error_message,
    executor::is_select,
    repair::contains_bare,
    store::Store
};

/// Minimum length of an acceptable statement
const MIN_SQL_LEN: usize = 10;

/// Reason a candidate statement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Rejection {
    /// Empty or shorter than ten characters
    TooShort,
    /// Does not start with `SELECT`
    NotSelect,
    /// A watched column fragment appears outside quotes
    UnquotedColumn(&'static str),
    /// A full identifier column name is not wrapped in double quotes
    UnwrappedIdentifier(&'static str),
    /// The dry run failed
    Execution(String)
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(f, "SQL too short or empty"),
            Self::NotSelect => write!(f, "SQL doesn't start with SELECT"),
            Self::UnquotedColumn(col) => write!(f, "Found unquoted column name: {}", col),
            Self::UnwrappedIdentifier(col) => write!(f, "Column '{}' not properly quoted", col),
            Self::Execution(msg) => write!(f, "SQL validation error: {}", msg)
        }
    }
}

/// Static checks plus a dry run against the store.
pub struct SqlValidator<'a> {
    store: &'a dyn Store
}

impl<'a> SqlValidator<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store
        }
    }

    pub fn store(&self) -> &'a dyn Store {
        self.store
    }

    /// Whether the statement is acceptable for execution
    pub fn is_valid(&self, sql: &str) -> bool {
        match self.check(sql) {
            Ok(()) => {
                debug!("SQL validated successfully");
                true
            }
            Err(rejection) => {
                warn!("{}", rejection);
                false
            }
        }
    }

    /// Run all checks, returning the first rejection
    pub fn check(&self, sql: &str) -> Result<(), Rejection> {
        check_static(sql)?;
        self.store
            .dry_run(sql)
            .map_err(|e| Rejection::Execution(error_message(&e)))
    }
}

/// String-pattern checks that need no store
pub fn check_static(sql: &str) -> Result<(), Rejection> {
    if sql.len() < MIN_SQL_LEN {
        return Err(Rejection::TooShort);
    }
    if !is_select(sql) {
        return Err(Rejection::NotSelect);
    }
    if let Some(term) = UNQUOTED_WATCH_LIST
        .iter()
        .copied()
        .find(|term| contains_bare(sql, term))
    {
        return Err(Rejection::UnquotedColumn(term));
    }
    if let Some(col) = IDENTIFIER_COLUMNS
        .iter()
        .copied()
        .find(|col| !fully_wrapped(sql, col))
    {
        return Err(Rejection::UnwrappedIdentifier(col));
    }
    Ok(())
}

/// Every occurrence of `name` has a double quote on both sides
fn fully_wrapped(sql: &str, name: &str) -> bool {
    sql.match_indices(name).all(|(idx, _)| {
        sql[..idx].ends_with('"') && sql[idx + name.len()..].starts_with('"')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short() {
        assert_eq!(check_static(""), Err(Rejection::TooShort));
        assert_eq!(check_static("SELECT 1"), Err(Rejection::TooShort));
    }

    #[test]
    fn test_not_select() {
        assert_eq!(
            check_static("DELETE FROM facts_assessment;"),
            Err(Rejection::NotSelect)
        );
    }

    #[test]
    fn test_unquoted_watch_list() {
        assert_eq!(
            check_static("SELECT STATE FROM facts_assessment;"),
            Err(Rejection::UnquotedColumn("STATE"))
        );
        assert_eq!(
            check_static("SELECT Ground Water FROM facts_assessment;"),
            Err(Rejection::UnquotedColumn("Ground Water"))
        );
    }

    #[test]
    fn test_quoted_long_names_pass() {
        let sql = "SELECT \"STATE - 1_level_1\", \
                   \"Net Annual Ground Water Availability for Future Use (ham) - Total\" \
                   FROM facts_assessment LIMIT 10;";
        assert_eq!(check_static(sql), Ok(()));
    }

    #[test]
    fn test_identifier_not_wrapped() {
        assert_eq!(
            check_static("SELECT \"STATE - 1_level_1 FROM facts_assessment;"),
            Err(Rejection::UnwrappedIdentifier("STATE - 1_level_1"))
        );
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            Rejection::UnquotedColumn("Rainfall").to_string(),
            "Found unquoted column name: Rainfall"
        );
    }
}
