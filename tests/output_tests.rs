mod common;

use common::{TABLE, memory_store};
use groundwater_sql::{
    catalog::SchemaCatalog,
    executor::{QueryExecutor, QueryResult},
    output::{
        OutputFormat, OutputOptions, format_answer, format_catalog, format_report, format_result
    },
    pipeline::{Candidate, HybridGenerator},
    rule_based::RuleBasedGenerator,
    validator::SqlValidator
};

fn plain(format: OutputFormat) -> OutputOptions {
    OutputOptions {
        format,
        colored: false
    }
}

fn sample_result() -> QueryResult {
    let store = memory_store();
    QueryExecutor::new(&store).execute(
        "SELECT \"DISTRICT - 2_level_1\", \"Rainfall (mm) - Command\" FROM facts_assessment \
         WHERE \"STATE - 1_level_1\" = 'KERALA';"
    )
}

#[test]
fn test_output_options_default() {
    let opts = OutputOptions::default();
    assert!(matches!(opts.format, OutputFormat::Text));
    assert!(opts.colored);
}

#[test]
fn test_result_text() {
    let text = format_result(&sample_result(), &plain(OutputFormat::Text));
    assert!(text.starts_with("DISTRICT - 2_level_1 | Rainfall (mm) - Command\n"));
    assert!(text.contains("IDUKKI | NULL\n"));
    assert!(text.ends_with("1 row(s)\n"));
}

#[test]
fn test_failure_text() {
    let text = format_result(
        &QueryResult::failure("Only SELECT queries are allowed."),
        &plain(OutputFormat::Text)
    );
    assert_eq!(text, "Error: Only SELECT queries are allowed.\n");
}

#[test]
fn test_result_json() {
    let json = format_result(&sample_result(), &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["data"][0]["DISTRICT - 2_level_1"], "IDUKKI");
}

#[test]
fn test_result_yaml() {
    let yaml = format_result(&sample_result(), &plain(OutputFormat::Yaml));
    assert!(yaml.contains("success: true"));
    assert!(yaml.contains("IDUKKI"));
}

#[test]
fn test_answer_text_and_json() {
    let candidate = Candidate::Rule {
        sql: String::from("SELECT * FROM facts_assessment LIMIT 10;")
    };
    let result = sample_result();

    let text = format_answer("q", &candidate, &result, &plain(OutputFormat::Text));
    assert!(text.contains("=== Generated SQL ===\nSELECT * FROM facts_assessment LIMIT 10;\n"));
    assert!(text.contains("Source: rules"));

    let json = format_answer("q", &candidate, &result, &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["question"], "q");
    assert_eq!(value["candidate"]["source"], "rule");
    assert_eq!(value["result"]["success"], true);
}

#[tokio::test]
async fn test_report_text_rules_only() {
    let store = memory_store();
    let generator = HybridGenerator::rules_only(
        RuleBasedGenerator::new(SchemaCatalog::load(&store, TABLE)),
        SqlValidator::new(&store)
    );
    let report = generator.generate_report("rainfall in Kerala").await.unwrap();

    let text = format_report(&report, &plain(OutputFormat::Text));
    assert!(text.contains("Question: rainfall in Kerala\n"));
    assert!(text.contains("Intent: recharge\n"));
    assert!(text.contains("Model: disabled\n"));
    assert!(text.contains("Final SQL (rules):"));

    let json = format_report(&report, &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["intent"], "recharge");
    assert!(value["model_raw"].is_null());
}

#[test]
fn test_catalog_formats() {
    let catalog = SchemaCatalog::load(&memory_store(), TABLE);
    let text = format_catalog(&catalog, &plain(OutputFormat::Text));
    assert!(text.starts_with("Table: facts_assessment"));

    let json = format_catalog(&catalog, &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["columns"].as_array().unwrap().len(), 10);
}
