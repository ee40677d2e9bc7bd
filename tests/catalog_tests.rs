mod common;

use common::{TABLE, memory_store};
use groundwater_sql::{catalog::SchemaCatalog, store::SqliteStore};

#[test]
fn test_load_columns_in_table_order() {
    let catalog = SchemaCatalog::load(&memory_store(), TABLE);
    assert_eq!(catalog.table, TABLE);
    assert_eq!(catalog.columns.len(), 10);
    assert_eq!(catalog.columns[0], "STATE - 1_level_1");
    assert_eq!(catalog.columns[1], "DISTRICT - 2_level_1");
}

#[test]
fn test_load_samples_distinct_locations() {
    let catalog = SchemaCatalog::load(&memory_store(), TABLE);
    assert_eq!(catalog.states.len(), 3);
    assert!(catalog.states.contains(&"TAMIL NADU".to_string()));
    assert!(catalog.states.contains(&"KARNATAKA".to_string()));
    assert_eq!(catalog.districts.len(), 4);
    assert!(catalog.districts.contains(&"COIMBATORE".to_string()));
}

#[test]
fn test_samples_are_bounded() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .execute_batch(r#"CREATE TABLE facts_assessment ("STATE - 1_level_1" TEXT);"#)
        .unwrap();
    for i in 0..30 {
        store
            .execute_batch(&format!(
                r#"INSERT INTO facts_assessment VALUES ('STATE {}');"#,
                i
            ))
            .unwrap();
    }
    let catalog = SchemaCatalog::load(&store, TABLE);
    assert_eq!(catalog.states.len(), 20);
}

#[test]
fn test_missing_district_column_yields_empty_sample() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .execute_batch(
            r#"CREATE TABLE facts_assessment ("STATE - 1_level_1" TEXT, "Rainfall (mm) - Total" REAL);
               INSERT INTO facts_assessment VALUES ('KERALA', 3000.0);
               INSERT INTO facts_assessment VALUES (NULL, 10.0);
               INSERT INTO facts_assessment VALUES ('', 10.0);"#
        )
        .unwrap();
    let catalog = SchemaCatalog::load(&store, TABLE);
    assert_eq!(catalog.states, vec!["KERALA"]);
    assert!(catalog.districts.is_empty());
    assert_eq!(catalog.columns.len(), 2);
}

#[test]
fn test_missing_table_yields_empty_catalog() {
    let store = SqliteStore::open_in_memory().unwrap();
    let catalog = SchemaCatalog::load(&store, "nowhere");
    assert!(catalog.columns.is_empty());
    assert!(catalog.states.is_empty());
    assert!(catalog.districts.is_empty());
}

#[test]
fn test_columns_matching_keeps_schema_order() {
    let catalog = SchemaCatalog::load(&memory_store(), TABLE);
    assert_eq!(
        catalog.columns_matching(&["RAINFALL"]),
        vec!["\"Rainfall (mm) - Total\"", "\"Rainfall (mm) - Command\""]
    );
}

#[test]
fn test_summary_lists_columns_and_samples() {
    let summary = SchemaCatalog::load(&memory_store(), TABLE).to_summary();
    assert!(summary.starts_with("Table: facts_assessment\n"));
    assert!(summary.contains("  - \"Stage of Ground Water Extraction (%) - Total\"\n"));
    assert!(summary.contains("Sample states: "));
    assert!(summary.contains("IDUKKI"));
}

#[test]
fn test_missing_identifier_columns_are_not_sampled() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .execute_batch(
            r#"CREATE TABLE facts_assessment ("X" TEXT);
               INSERT INTO facts_assessment VALUES ('a');"#
        )
        .unwrap();
    let catalog = SchemaCatalog::load(&store, TABLE);
    assert_eq!(catalog.columns, vec!["X"]);
    assert!(catalog.states.is_empty());
    assert!(catalog.districts.is_empty());
}
