//! Deterministic rule-based SQL generator.
//!
//! Maps question keywords to a column selection and location filters using
//! the fixed intent taxonomy from [`Intent`]. The output is a pure function of
//! the question and the catalog snapshot, which makes it the trusted fallback
//! of the hybrid pipeline.
//!
//! # Example
//!
//! ```
//! use groundwater_sql::{catalog::SchemaCatalog, rule_based::RuleBasedGenerator};
//!
//! let catalog = SchemaCatalog::from_parts(
//!     "facts_assessment",
//!     vec![],
//!     vec!["TAMIL NADU".into()],
//!     vec![]
//! );
//! let generator = RuleBasedGenerator::new(catalog);
//!
//! let sql = generator.generate("Show me groundwater data from Tamil Nadu");
//! assert!(sql.contains("WHERE \"STATE - 1_level_1\" = 'TAMIL NADU'"));
//! assert!(sql.ends_with("LIMIT 10;"));
//! ```

use crate::{
    catalog::SchemaCatalog,
    columns::{
        AVAILABILITY_COLUMNS, DISTRICT_COLUMN, EXTRACTION_COLUMNS, GENERIC_COLUMNS,
        RECHARGE_COLUMNS, ROW_LIMIT, STATE_COLUMN, quote
    },
    intent::{Intent, contains_any}
};

const AVAILABILITY_KEYWORDS: &[&str] = &[
    "AVAILABLE",
    "AVAILABILITY",
    "REMAINING",
    "LEFT",
    "USABLE",
    "UNUSED",
    "FUTURE USE"
];

const GROUND_WATER_TERMS: &[&str] = &["WATER LEVEL", "GROUND WATER", "GROUNDWATER"];

const GROUND_WATER_COLUMN_TERMS: &[&str] = &["GROUND WATER", "GROUNDWATER"];

/// Maximum number of generic ground water columns selected
const GROUND_WATER_COLUMN_LIMIT: usize = 4;

/// Equality predicate on an identifier column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFilter {
    /// Unquoted column name
    pub column: &'static str,
    /// Literal value exactly as sampled
    pub value:  String
}

/// Keyword-driven SQL generator over a fixed catalog snapshot.
#[derive(Debug, Clone)]
pub struct RuleBasedGenerator {
    catalog: SchemaCatalog
}

impl RuleBasedGenerator {
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self {
            catalog
        }
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Intent of the question
    pub fn intent(&self, question: &str) -> Intent {
        Intent::classify(question)
    }

    /// Generate a complete `SELECT ... LIMIT 10;` statement
    pub fn generate(&self, question: &str) -> String {
        let columns = self.select_columns(question);
        let filters = self.locations(question);
        let mut sql = format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            self.catalog.table
        );
        if !filters.is_empty() {
            let conditions: Vec<String> = filters
                .iter()
                .map(|f| format!("{} = '{}'", quote(f.column), f.value))
                .collect();
            sql.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }
        sql.push_str(&format!(" LIMIT {};", ROW_LIMIT));
        sql
    }

    /// Quoted columns for the question, identifier columns included
    pub fn select_columns(&self, question: &str) -> Vec<String> {
        let upper = question.to_uppercase();
        let intent = Intent::classify(question);
        let mut selected = if upper.contains("RAINFALL") {
            self.catalog.columns_matching(&["RAINFALL"])
        } else if intent == Intent::Availability || contains_any(&upper, AVAILABILITY_KEYWORDS) {
            quote_all(AVAILABILITY_COLUMNS)
        } else if contains_any(&upper, GROUND_WATER_TERMS) {
            match intent {
                Intent::Recharge => quote_all(RECHARGE_COLUMNS),
                Intent::Extraction => quote_all(EXTRACTION_COLUMNS),
                _ => {
                    let mut matched = self.catalog.columns_matching(GROUND_WATER_COLUMN_TERMS);
                    matched.truncate(GROUND_WATER_COLUMN_LIMIT);
                    matched
                }
            }
        } else {
            quote_all(GENERIC_COLUMNS)
        };
        let state = quote(STATE_COLUMN);
        let district = quote(DISTRICT_COLUMN);
        if !selected.contains(&state) && !selected.contains(&district) {
            selected.insert(0, district);
            selected.insert(0, state);
        }
        selected
    }

    /// Location filters found in the question: at most one state and one
    /// district, state first
    pub fn locations(&self, question: &str) -> Vec<LocationFilter> {
        let upper = question.to_uppercase();
        let mut filters = Vec::with_capacity(2);
        if let Some(state) = first_mentioned(&self.catalog.states, &upper) {
            filters.push(LocationFilter {
                column: STATE_COLUMN,
                value:  state.clone()
            });
        }
        if let Some(district) = first_mentioned(&self.catalog.districts, &upper) {
            filters.push(LocationFilter {
                column: DISTRICT_COLUMN,
                value:  district.clone()
            });
        }
        filters
    }
}

fn quote_all(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| quote(c)).collect()
}

fn first_mentioned<'a>(values: &'a [String], upper_question: &str) -> Option<&'a String> {
    values
        .iter()
        .find(|v| !v.is_empty() && upper_question.contains(&v.to_uppercase()))
}
