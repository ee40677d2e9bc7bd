use groundwater_sql::repair::SqlEnhancer;

const INPUTS: &[&str] = &[
    "SELECT STATE, DISTRICT FROM facts_assessment",
    "select state, district, Rainfall from WHERE STATE = \"KERALA\"",
    "SELECT Ground Water FROM facts_assessment WHERE District = 'CHENNAI'",
    "SELECT \"Net Annual Ground Water Availability for Future Use (ham) - Total\" FROM facts_assessment",
    "SELECT State, Rainfall FROM facts_assessment LIMIT 5",
    "SELECT * FROM WHERE STATE = \"TAMIL NADU\" AND DISTRICT = \"COIMBATORE\";",
    "SELECT Rainfall FROM facts_assessment WHERE STATE = 'STATE'"
];

#[test]
fn test_enhance_is_idempotent() {
    let enhancer = SqlEnhancer::default();
    for input in INPUTS {
        let once = enhancer.enhance(input, "");
        let twice = enhancer.enhance(&once, "");
        assert_eq!(once, twice, "input: {}", input);
    }
}

#[test]
fn test_enhanced_output_shape() {
    let enhancer = SqlEnhancer::default();
    for input in INPUTS {
        let sql = enhancer.enhance(input, "");
        assert!(sql.ends_with(';'), "{}", sql);
        assert!(sql.to_uppercase().contains("LIMIT"), "{}", sql);
        assert!(sql.contains("facts_assessment"), "{}", sql);
    }
}

#[test]
fn test_ground_water_and_literals() {
    let sql = SqlEnhancer::default().enhance(
        "SELECT Ground Water FROM facts_assessment WHERE District = 'CHENNAI'",
        "ground water in chennai"
    );
    assert_eq!(
        sql,
        "SELECT \"Ground Water Recharge (ham) - Total\" FROM facts_assessment \
         WHERE \"DISTRICT - 2_level_1\" = 'CHENNAI' LIMIT 10;"
    );
}

#[test]
fn test_literal_values_untouched() {
    let sql = SqlEnhancer::default()
        .enhance("SELECT Rainfall FROM facts_assessment WHERE STATE = 'STATE'", "");
    assert_eq!(
        sql,
        "SELECT \"Rainfall (mm) - Total\" FROM facts_assessment \
         WHERE \"STATE - 1_level_1\" = 'STATE' LIMIT 10;"
    );
}

#[test]
fn test_repair_is_stable_on_valid_sql() {
    let enhancer = SqlEnhancer::default();
    let sql = "SELECT \"STATE - 1_level_1\" FROM facts_assessment \
               WHERE \"STATE - 1_level_1\" IN ('KERALA', 'GOA') LIMIT 10;";
    assert_eq!(enhancer.repair(sql), sql);
}

#[test]
fn test_repair_forces_limit() {
    let sql = SqlEnhancer::default().repair("SELECT DISTRICT FROM facts_assessment");
    assert_eq!(
        sql,
        "SELECT \"DISTRICT - 2_level_1\" FROM facts_assessment LIMIT 10;"
    );
}

#[test]
fn test_limit_inside_literal_does_not_count() {
    let enhancer = SqlEnhancer::default();
    let sql = enhancer.enhance(
        "SELECT * FROM facts_assessment WHERE \"DISTRICT - 2_level_1\" != 'UNLIMITED'",
        ""
    );
    assert_eq!(
        sql,
        "SELECT * FROM facts_assessment WHERE \"DISTRICT - 2_level_1\" != 'UNLIMITED' LIMIT 10;"
    );
    assert_eq!(
        enhancer.repair("SELECT \"Limit Column\" FROM facts_assessment"),
        "SELECT \"Limit Column\" FROM facts_assessment LIMIT 10;"
    );
}
