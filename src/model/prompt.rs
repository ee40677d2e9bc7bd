//! Instruction prompt for the text-to-SQL model.

use crate::{
    catalog::SchemaCatalog,
    columns::{ANNUAL_RECHARGE_TOTAL, DISTRICT_COLUMN, RAINFALL_TOTAL, RECHARGE_TOTAL, STATE_COLUMN}
};

/// Literal question/SQL pairs shown to the model
const EXAMPLES: &[(&str, &str)] = &[
    (
        "What is the water level in Coimbatore?",
        "SELECT * FROM facts_assessment WHERE \"DISTRICT - 2_level_1\" = 'COIMBATORE' LIMIT 10;"
    ),
    (
        "Show me groundwater data from Tamil Nadu",
        "SELECT * FROM facts_assessment WHERE \"STATE - 1_level_1\" = 'TAMIL NADU' LIMIT 10;"
    ),
    (
        "What is the groundwater level in Tamil Nadu?",
        "SELECT \"STATE - 1_level_1\", \"DISTRICT - 2_level_1\", \"Ground Water Recharge (ham) - Total\" \
         FROM facts_assessment WHERE \"STATE - 1_level_1\" = 'TAMIL NADU' LIMIT 15;"
    ),
    (
        "Show me groundwater levels in Coimbatore Tamil Nadu",
        "SELECT \"STATE - 1_level_1\", \"DISTRICT - 2_level_1\", \"Ground Water Recharge (ham) - Total\", \
         \"Annual Ground water Recharge (ham) - Total\" FROM facts_assessment \
         WHERE \"DISTRICT - 2_level_1\" = 'COIMBATORE' AND \"STATE - 1_level_1\" = 'TAMIL NADU' LIMIT 10;"
    )
];

/// Render the prompt for one question
pub fn build_prompt(question: &str, catalog: &SchemaCatalog) -> String {
    let mut prompt = format!(
        "You are an expert SQL generator. Generate a SQL query for: \"{}\"\n\n",
        question
    );
    prompt.push_str(
        "IMPORTANT: You must use the EXACT column names as they appear in the database schema:\n"
    );
    prompt.push_str(&format!(
        "- The state column is \"{}\" (must be in double quotes)\n",
        STATE_COLUMN
    ));
    prompt.push_str(&format!(
        "- The district column is \"{}\" (must be in double quotes)\n",
        DISTRICT_COLUMN
    ));
    prompt.push_str(&format!(
        "- Ground water columns include \"{}\", \"{}\" (all in quotes)\n",
        RECHARGE_TOTAL, ANNUAL_RECHARGE_TOTAL
    ));
    prompt.push_str(&format!(
        "- Rainfall columns include \"{}\" (in quotes)\n\n",
        RAINFALL_TOTAL
    ));
    prompt.push_str("Examples:\n");
    for (question, sql) in EXAMPLES {
        prompt.push_str(&format!("Question: {}\nSQL: {}\n\n", question, sql));
    }
    prompt.push_str("Rules:\n");
    prompt.push_str("- Always use EXACT column names with double quotes\n");
    prompt.push_str(&format!(
        "- Start with SELECT, include FROM {}\n",
        catalog.table
    ));
    prompt.push_str("- Always use proper quoting for column names\n");
    prompt.push_str("- Do not invent column names that don't exist in the schema\n");
    prompt.push_str("- End properly with LIMIT and semicolon\n");
    prompt.push_str("- Use uppercase for location values like 'TAMIL NADU' and 'CHENNAI'\n\n");
    prompt.push_str("SQL:");
    prompt
}

/// Remove markdown code fences and surrounding whitespace
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```sql", "").replace("```", "").trim().to_string()
}
