//! Dataset-specific column tables.
//!
//! The groundwater assessment table uses long, punctuated column names that
//! must always be double-quoted in SQL. Every place that needs to know about
//! them (rule generator, enhancer, validator, prompt) reads from the tables
//! below, so a schema change touches only this module.

/// Default table holding the assessment facts
pub const TABLE_NAME: &str = "facts_assessment";

/// Identifier column for the state
pub const STATE_COLUMN: &str = "STATE - 1_level_1";

/// Identifier column for the district
pub const DISTRICT_COLUMN: &str = "DISTRICT - 2_level_1";

/// Maximum number of distinct identifier values sampled per column
pub const SAMPLE_LIMIT: usize = 20;

/// Row limit appended to every generated statement
pub const ROW_LIMIT: usize = 10;

pub const RAINFALL_TOTAL: &str = "Rainfall (mm) - Total";
pub const RECHARGE_TOTAL: &str = "Ground Water Recharge (ham) - Total";
pub const ANNUAL_RECHARGE_TOTAL: &str = "Annual Ground water Recharge (ham) - Total";
pub const NET_AVAILABILITY_TOTAL: &str =
    "Net Annual Ground Water Availability for Future Use (ham) - Total";
pub const EXTRACTABLE_TOTAL: &str = "Annual Extractable Ground water Resource (ham) - Total";
pub const EXTRACTION_TOTAL: &str = "Ground Water Extraction for all uses (ha.m) - Total";
pub const EXTRACTION_STAGE_TOTAL: &str = "Stage of Ground Water Extraction (%) - Total";

/// Columns selected for availability questions
pub const AVAILABILITY_COLUMNS: &[&str] = &[
    STATE_COLUMN,
    DISTRICT_COLUMN,
    NET_AVAILABILITY_TOTAL,
    EXTRACTABLE_TOTAL
];

/// Columns selected for recharge questions about ground water
pub const RECHARGE_COLUMNS: &[&str] = &[STATE_COLUMN, DISTRICT_COLUMN, ANNUAL_RECHARGE_TOTAL];

/// Columns selected for extraction questions about ground water
pub const EXTRACTION_COLUMNS: &[&str] = &[
    STATE_COLUMN,
    DISTRICT_COLUMN,
    EXTRACTION_TOTAL,
    EXTRACTION_STAGE_TOTAL
];

/// Representative columns for questions matching no specific pattern
pub const GENERIC_COLUMNS: &[&str] = &[
    STATE_COLUMN,
    DISTRICT_COLUMN,
    RAINFALL_TOTAL,
    ANNUAL_RECHARGE_TOTAL,
    EXTRACTION_STAGE_TOTAL
];

/// Bare spellings a model emits instead of the real column names, in the
/// order they are substituted.
pub const COLUMN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("STATE", STATE_COLUMN),
    ("DISTRICT", DISTRICT_COLUMN),
    ("state", STATE_COLUMN),
    ("district", DISTRICT_COLUMN),
    ("State", STATE_COLUMN),
    ("District", DISTRICT_COLUMN),
    ("Ground Water", RECHARGE_TOTAL),
    ("Rainfall", RAINFALL_TOTAL)
];

/// Fragments that must never appear outside a quoted identifier
pub const UNQUOTED_WATCH_LIST: &[&str] = &["STATE", "DISTRICT", "Ground Water", "Rainfall"];

/// Identifier columns that must always be fully wrapped in double quotes
pub const IDENTIFIER_COLUMNS: &[&str] = &[STATE_COLUMN, DISTRICT_COLUMN];

/// Wrap a column name in double quotes
pub fn quote(column: &str) -> String {
    format!("\"{}\"", column)
}
