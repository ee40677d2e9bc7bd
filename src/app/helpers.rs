//! Helper functions for CLI operations.
//!
//! Resolving effective settings from CLI arguments and configuration,
//! building the model provider and computing exit codes.

use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::{Format, ModelArgs},
    config::Config,
    error::AppResult,
    executor::QueryResult,
    llm::{LlmProvider, build_provider},
    output::{OutputFormat, OutputOptions}
};

/// Converts the CLI format to the internal [`OutputFormat`].
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Creates output options from CLI flags.
///
/// # Example
///
/// ```
/// use groundwater_sql::{app::create_output_options, cli::Format};
///
/// let opts = create_output_options(Format::Json, true);
/// assert!(!opts.colored);
/// ```
pub fn create_output_options(format: Format, no_color: bool) -> OutputOptions {
    OutputOptions {
        format:  convert_format(format),
        colored: !no_color
    }
}

/// Database path: CLI argument first, configuration second.
pub fn effective_database(database: Option<PathBuf>, config: &Config) -> PathBuf {
    database.unwrap_or_else(|| config.database.path.clone())
}

/// Resolves the model provider from CLI arguments and configuration.
///
/// Returns `None` in rules-only mode. CLI values win over configuration.
///
/// # Errors
///
/// Returns an error for unknown providers or a missing API key for
/// OpenAI and Anthropic.
pub fn resolve_provider(args: &ModelArgs, config: &Config) -> AppResult<Option<LlmProvider>> {
    if args.rules_only {
        return Ok(None);
    }
    let name = args
        .provider
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| config.llm.provider.clone());
    let provider = build_provider(
        &name,
        args.model.clone().or_else(|| config.llm.model.clone()),
        args.api_key.clone().or_else(|| config.llm.api_key.clone()),
        args.base_url.clone().or_else(|| config.llm.base_url.clone())
    )?;
    Ok(Some(provider))
}

/// Exit code for an executed statement: `0` on success, `1` otherwise.
pub fn result_exit_code(result: &QueryResult) -> i32 {
    if result.success { 0 } else { 1 }
}

/// Spinner shown while the model runs.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
