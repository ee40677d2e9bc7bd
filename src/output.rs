use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::{
    catalog::SchemaCatalog,
    executor::QueryResult,
    pipeline::{Candidate, GenerationReport}
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true
        }
    }
}

/// Answer to a question for serialization
#[derive(Debug, Serialize)]
pub struct Answer<'a> {
    pub question:  &'a str,
    pub candidate: &'a Candidate,
    pub result:    &'a QueryResult
}

/// Format the answer to a question: accepted SQL plus its result
pub fn format_answer(
    question: &str,
    candidate: &Candidate,
    result: &QueryResult,
    opts: &OutputOptions
) -> String {
    let answer = Answer {
        question,
        candidate,
        result
    };
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&answer).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(&answer).unwrap_or_default(),
        OutputFormat::Text => {
            let source = if candidate.is_fallback() { "rules" } else { "model" };
            let mut output = heading("=== Generated SQL ===", opts);
            output.push_str(&format!("{}\n", candidate.sql()));
            output.push_str(&format!("Source: {}\n\n", source));
            output.push_str(&format_result_text(result, opts));
            output
        }
    }
}

/// Format a query result on its own
pub fn format_result(result: &QueryResult, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(result).unwrap_or_default(),
        OutputFormat::Text => format_result_text(result, opts)
    }
}

/// Format the per-stage generation report
pub fn format_report(report: &GenerationReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Text => {
            let mut output = heading("=== Generation Report ===", opts);
            output.push_str(&format!("Question: {}\n", report.question));
            output.push_str(&format!("Intent: {}\n\n", report.intent));
            match (&report.model_raw, &report.model_error) {
                (Some(raw), _) => output.push_str(&format!("Model output:\n  {}\n", raw)),
                (None, Some(err)) => output.push_str(&format!("Model error:\n  {}\n", err)),
                (None, None) => output.push_str("Model: disabled\n")
            }
            push_stage(&mut output, "Enhanced", &report.enhanced, &report.enhanced_rejection, opts);
            push_stage(&mut output, "Repaired", &report.repaired, &report.repaired_rejection, opts);
            output.push_str(&format!("Rule-based SQL:\n  {}\n\n", report.rule_sql));
            let label = if report.candidate.is_fallback() {
                "Final SQL (rules):"
            } else {
                "Final SQL (model):"
            };
            if opts.colored {
                output.push_str(&label.cyan().bold().to_string());
            } else {
                output.push_str(label);
            }
            output.push_str(&format!("\n  {}\n", report.candidate.sql()));
            output
        }
    }
}

/// Format the schema catalog
pub fn format_catalog(catalog: &SchemaCatalog, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(catalog).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(catalog).unwrap_or_default(),
        OutputFormat::Text => catalog.to_summary()
    }
}

fn heading(title: &str, opts: &OutputOptions) -> String {
    if opts.colored {
        format!("{}\n", title.bold())
    } else {
        format!("{}\n", title)
    }
}

fn push_stage<T: std::fmt::Display>(
    output: &mut String,
    name: &str,
    sql: &Option<String>,
    rejection: &Option<T>,
    opts: &OutputOptions
) {
    let Some(sql) = sql else {
        return;
    };
    output.push_str(&format!("{} SQL:\n  {}\n", name, sql));
    let status = match rejection {
        Some(reason) => format!("rejected: {}", reason),
        None => String::from("accepted")
    };
    if !opts.colored {
        output.push_str(&format!("  [{}]\n", status));
    } else if rejection.is_some() {
        output.push_str(&format!("  [{}]\n", status.red()));
    } else {
        output.push_str(&format!("  [{}]\n", status.green()));
    }
}

fn format_result_text(result: &QueryResult, opts: &OutputOptions) -> String {
    if !result.success {
        let error = result.error.as_deref().unwrap_or("unknown error");
        return if opts.colored {
            format!("{} {}\n", "Error:".red().bold(), error)
        } else {
            format!("Error: {}\n", error)
        };
    }
    let columns = result.columns.as_deref().unwrap_or_default();
    let rows = result.data.as_deref().unwrap_or_default();
    let mut output = String::new();
    let header = columns.join(" | ");
    if opts.colored {
        output.push_str(&header.cyan().bold().to_string());
    } else {
        output.push_str(&header);
    }
    output.push('\n');
    for row in rows {
        let cells: Vec<String> = row.values().map(display_value).collect();
        output.push_str(&cells.join(" | "));
        output.push('\n');
    }
    output.push_str(&format!("\n{} row(s)\n", rows.len()));
    output
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::from("NULL"),
        Value::String(s) => s.clone(),
        other => other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&Value::Null), "NULL");
        assert_eq!(display_value(&Value::from("KERALA")), "KERALA");
        assert_eq!(display_value(&Value::from(12.5)), "12.5");
    }
}
