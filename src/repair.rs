//! SQL enhancement and repair of model output.
//!
//! Text-to-SQL models trained on generic schemas tend to emit bare column
//! names (`STATE`, `Rainfall`), drop the table name, forget the `LIMIT` clause
//! and use double quotes for string values. [`SqlEnhancer::enhance`] rewrites
//! those defects in a fixed order and is idempotent on its own output.
//! [`SqlEnhancer::repair`] is the blunter second pass the pipeline applies
//! when the enhanced statement still fails validation.
//!
//! # Example
//!
//! ```
//! use groundwater_sql::repair::SqlEnhancer;
//!
//! let enhancer = SqlEnhancer::default();
//! let sql = enhancer.enhance("SELECT Rainfall FROM WHERE STATE = \"KERALA\"", "rainfall in kerala");
//!
//! assert_eq!(
//!     sql,
//!     "SELECT \"Rainfall (mm) - Total\" FROM facts_assessment WHERE \"STATE - 1_level_1\" = 'KERALA' LIMIT 10;"
//! );
//! assert_eq!(enhancer.enhance(&sql, "rainfall in kerala"), sql);
//! ```

mod lexer;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

pub(crate) use lexer::{contains_bare, has_trailing_statement};
use lexer::{contains_keyword, replace_in_code};

use crate::columns::{
    COLUMN_SUBSTITUTIONS, DISTRICT_COLUMN, ROW_LIMIT, STATE_COLUMN, TABLE_NAME, quote
};

static QUOTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]+""#).expect("valid quoted name pattern"));

static FROM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM ").expect("valid FROM pattern"));

static WHERE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bWHERE\b").expect("valid WHERE pattern"));

static KEYWORD_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(LIKE|IN|BETWEEN|IS)\b").expect("valid operator pattern")
});

static DOUBLE_QUOTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"=\s*"([^"]*)""#).expect("valid value pattern"));

/// Columns the repair pass substitutes without word-boundary checks
const REPAIR_SUBSTITUTIONS: &[(&str, &str)] =
    &[("STATE", STATE_COLUMN), ("DISTRICT", DISTRICT_COLUMN)];

/// Deterministic rewriter for candidate SQL targeting one table.
#[derive(Debug, Clone)]
pub struct SqlEnhancer {
    table: String
}

impl Default for SqlEnhancer {
    fn default() -> Self {
        Self::new(TABLE_NAME)
    }
}

impl SqlEnhancer {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into()
        }
    }

    /// Enhance raw model output
    pub fn enhance(&self, raw: &str, question: &str) -> String {
        self.enhance_with_reference(raw, "", question)
    }

    /// Enhance raw model output, borrowing column quoting from `reference`
    /// when the model emitted no quoted identifiers at all.
    ///
    /// Steps, in order:
    /// 1. substitute bare column spellings with quoted canonical names
    /// 2. copy quoting from the reference statement
    /// 3. insert the table name after the first `FROM`
    /// 4. append `LIMIT 10` when no limit is present
    /// 5. terminate with `;`
    /// 6. turn `= "value"` into `= 'value'`
    pub fn enhance_with_reference(&self, raw: &str, reference: &str, question: &str) -> String {
        let mut sql = raw.to_string();
        for (bare, column) in COLUMN_SUBSTITUTIONS {
            sql = replace_in_code(&sql, bare, &quote(column), true);
        }
        if !sql.contains('"') && reference.contains('"') {
            for quoted in QUOTED_NAME.find_iter(reference) {
                let quoted = quoted.as_str();
                let bare = quoted.trim_matches('"');
                if sql.contains(bare) {
                    sql = sql.replace(bare, quoted);
                }
            }
        }
        if !sql.to_lowercase().contains(&self.table.to_lowercase())
            && let Some(at) = FROM_TOKEN.find(&sql).map(|m| m.end())
        {
            sql.insert_str(at, &format!("{} ", self.table));
        }
        if !has_limit(&sql) {
            sql = append_limit(&sql);
        }
        sql = terminate(&sql);
        let sql = DOUBLE_QUOTED_VALUE.replace_all(&sql, "= '$1'").into_owned();
        debug!(question, enhanced = %sql, "Enhanced model SQL");
        sql
    }

    /// Aggressive second repair pass.
    ///
    /// Replaces every unquoted `STATE`/`DISTRICT` fragment regardless of word
    /// boundaries, collapses doubled quotes, drops a `WHERE` clause that has
    /// no comparison operator and forces `LIMIT` and `;`.
    pub fn repair(&self, sql: &str) -> String {
        let mut sql = sql.to_string();
        for (bare, column) in REPAIR_SUBSTITUTIONS {
            sql = replace_in_code(&sql, bare, &quote(column), false);
        }
        sql = sql.replace("\"\"", "\"").replace("''", "'");
        if let Some(clause) = WHERE_TOKEN.find(&sql).map(|m| m.range())
            && !has_comparison(&sql[clause.end..])
        {
            sql = format!("{} LIMIT {};", sql[..clause.start].trim_end(), ROW_LIMIT);
        }
        if !has_limit(&sql) {
            sql = append_limit(&sql);
        }
        let sql = terminate(&sql);
        debug!(repaired = %sql, "Repaired model SQL");
        sql
    }
}

fn has_limit(sql: &str) -> bool {
    contains_keyword(sql, "LIMIT")
}

fn has_comparison(clause: &str) -> bool {
    clause.contains(['=', '<', '>']) || KEYWORD_OPERATOR.is_match(clause)
}

/// Insert `LIMIT 10` before the trailing `;`, adding one if absent
fn append_limit(sql: &str) -> String {
    let trimmed = sql.trim_end();
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    format!("{} LIMIT {};", body, ROW_LIMIT)
}

fn terminate(sql: &str) -> String {
    let trimmed = sql.trim_end();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{};", trimmed)
    }
}
