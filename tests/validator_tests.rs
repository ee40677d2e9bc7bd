mod common;

use common::memory_store;
use groundwater_sql::validator::{Rejection, SqlValidator};

#[test]
fn test_valid_statement() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    assert!(validator.is_valid(
        "SELECT \"STATE - 1_level_1\", \"Rainfall (mm) - Total\" FROM facts_assessment \
         WHERE \"STATE - 1_level_1\" = 'KERALA' LIMIT 10;"
    ));
}

#[test]
fn test_lowercase_select_is_accepted() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    assert_eq!(
        validator.check("  select * from facts_assessment limit 1;"),
        Ok(())
    );
}

#[test]
fn test_short_and_non_select() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    assert_eq!(validator.check(""), Err(Rejection::TooShort));
    assert_eq!(
        validator.check("DROP TABLE facts_assessment;"),
        Err(Rejection::NotSelect)
    );
}

#[test]
fn test_bare_watch_list_terms() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    assert_eq!(
        validator.check("SELECT DISTRICT FROM facts_assessment LIMIT 10;"),
        Err(Rejection::UnquotedColumn("DISTRICT"))
    );
    assert!(!validator.is_valid("SELECT Rainfall FROM facts_assessment LIMIT 10;"));
}

#[test]
fn test_watch_terms_inside_literals_are_ignored() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    assert_eq!(
        validator.check(
            "SELECT * FROM facts_assessment WHERE \"STATE - 1_level_1\" = 'STATE' LIMIT 10;"
        ),
        Ok(())
    );
}

#[test]
fn test_half_quoted_identifier() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    assert_eq!(
        validator.check("SELECT \"DISTRICT - 2_level_1 FROM facts_assessment LIMIT 10;"),
        Err(Rejection::UnwrappedIdentifier("DISTRICT - 2_level_1"))
    );
}

#[test]
fn test_execution_failure() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    let rejection = validator
        .check("SELECT nope FROM facts_assessment LIMIT 10;")
        .unwrap_err();
    assert_eq!(rejection, Rejection::Execution(String::from("no such column: nope")));
    assert!(!validator.is_valid("SELECT * FROM missing_table LIMIT 10;"));
}

#[test]
fn test_unknown_quoted_column_fails_dry_run() {
    let store = memory_store();
    let validator = SqlValidator::new(&store);
    let rejection = validator
        .check("SELECT \"Imaginary Column\" FROM facts_assessment LIMIT 10;")
        .unwrap_err();
    assert!(matches!(rejection, Rejection::Execution(ref msg) if msg.contains("Imaginary Column")));
}
