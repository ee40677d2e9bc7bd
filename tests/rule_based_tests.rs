mod common;

use common::{memory_store, rules};
use groundwater_sql::{intent::Intent, validator::SqlValidator};

#[test]
fn test_tamil_nadu_state_filter() {
    let sql = rules(&memory_store()).generate("Show me groundwater data from Tamil Nadu");
    assert!(sql.contains("WHERE \"STATE - 1_level_1\" = 'TAMIL NADU'"));
    assert!(sql.ends_with(" LIMIT 10;"));
}

#[test]
fn test_deterministic_output() {
    let store = memory_store();
    let first = rules(&store);
    let second = rules(&store);
    for question in [
        "What is the available groundwater in Tamil Nadu?",
        "rainfall in Coimbatore",
        "groundwater extraction in Karnataka"
    ] {
        let sql = first.generate(question);
        assert_eq!(sql, first.generate(question));
        assert_eq!(sql, second.generate(question));
    }
}

#[test]
fn test_karnataka_availability() {
    let generator = rules(&memory_store());
    let question = "How much usable groundwater is there in Karnataka?";
    assert_eq!(generator.intent(question), Intent::Availability);
    assert_eq!(
        generator.generate(question),
        "SELECT \"STATE - 1_level_1\", \"DISTRICT - 2_level_1\", \
         \"Net Annual Ground Water Availability for Future Use (ham) - Total\", \
         \"Annual Extractable Ground water Resource (ham) - Total\" FROM facts_assessment \
         WHERE \"STATE - 1_level_1\" = 'KARNATAKA' LIMIT 10;"
    );
}

#[test]
fn test_extraction_columns() {
    let sql = rules(&memory_store()).generate("groundwater extraction in Chennai");
    assert_eq!(
        sql,
        "SELECT \"STATE - 1_level_1\", \"DISTRICT - 2_level_1\", \
         \"Ground Water Extraction for all uses (ha.m) - Total\", \
         \"Stage of Ground Water Extraction (%) - Total\" FROM facts_assessment \
         WHERE \"DISTRICT - 2_level_1\" = 'CHENNAI' LIMIT 10;"
    );
}

#[test]
fn test_recharge_columns_with_state_and_district() {
    let sql = rules(&memory_store()).generate("ground water recharge in Idukki, Kerala");
    assert_eq!(
        sql,
        "SELECT \"STATE - 1_level_1\", \"DISTRICT - 2_level_1\", \
         \"Annual Ground water Recharge (ham) - Total\" FROM facts_assessment \
         WHERE \"STATE - 1_level_1\" = 'KERALA' AND \"DISTRICT - 2_level_1\" = 'IDUKKI' LIMIT 10;"
    );
}

#[test]
fn test_water_level_takes_four_ground_water_columns() {
    let columns = rules(&memory_store()).select_columns("What's the water level in Coimbatore?");
    assert_eq!(columns.len(), 6);
    assert_eq!(columns[2], "\"Ground Water Recharge (ham) - Total\"");
    assert_eq!(columns[5], "\"Ground Water Extraction for all uses (ha.m) - Total\"");
}

#[test]
fn test_rule_output_passes_validation() {
    let store = memory_store();
    let generator = rules(&store);
    let validator = SqlValidator::new(&store);
    for question in [
        "What is the available groundwater in Tamil Nadu?",
        "What's the water level in Coimbatore?",
        "rainfall in Kerala",
        "anything at all"
    ] {
        let sql = generator.generate(question);
        assert_eq!(validator.check(&sql), Ok(()), "{}", sql);
    }
}
