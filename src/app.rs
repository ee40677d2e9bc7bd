//! Application logic for the groundwater-sql CLI.
//!
//! Kept apart from the binary entry point so commands can be tested without
//! spawning a process.

mod helpers;
mod types;

use tracing::info;

pub use self::{
    helpers::{
        convert_format, create_output_options, effective_database, resolve_provider,
        result_exit_code, spinner
    },
    types::CommandOutput
};
use crate::{
    catalog::SchemaCatalog,
    cli::{CommonArgs, ModelArgs},
    config::Config,
    error::AppResult,
    executor::QueryExecutor,
    llm::LlmLoader,
    model::{ModelBasedGenerator, ModelHandle},
    output::{OutputFormat, format_answer, format_catalog, format_report, format_result},
    pipeline::HybridGenerator,
    rule_based::RuleBasedGenerator,
    store::SqliteStore,
    validator::SqlValidator
};

/// Open the configured database read-only
pub fn open_store(common: &CommonArgs, config: &Config) -> AppResult<SqliteStore> {
    let path = effective_database(common.database.clone(), config);
    info!("Opening database {}", path.display());
    SqliteStore::open(&path)
}

/// Assemble the hybrid pipeline over a store
pub fn build_generator<'a>(
    store: &'a SqliteStore,
    args: &ModelArgs,
    config: &Config
) -> AppResult<HybridGenerator<'a>> {
    let catalog = SchemaCatalog::load(store, &config.database.table);
    let model = resolve_provider(args, config)?.map(|provider| {
        info!(provider = provider.name(), model = provider.model(), "Model generation enabled");
        let handle = ModelHandle::new(LlmLoader::new(provider, config.retry.clone()));
        ModelBasedGenerator::with_params(handle, catalog.clone(), config.generation.clone())
    });
    let rules = RuleBasedGenerator::new(catalog);
    Ok(HybridGenerator::new(model, rules, SqlValidator::new(store)))
}

/// Generate SQL for a question, run it and format the answer
pub async fn run_ask(
    question: &str,
    args: &ModelArgs,
    common: &CommonArgs,
    config: &Config
) -> AppResult<CommandOutput> {
    let store = open_store(common, config)?;
    let generator = build_generator(&store, args, config)?;
    let opts = create_output_options(common.output_format, common.no_color);
    let pb = show_spinner(&generator, &opts.format);
    let candidate = generator.generate(question).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let candidate = candidate?;
    let result = generator.run_sql(candidate.sql());
    let output = format_answer(question, &candidate, &result, &opts);
    Ok(CommandOutput::with_code(result_exit_code(&result), output))
}

/// Run a statement directly
pub fn run_statement(statement: &str, common: &CommonArgs, config: &Config) -> AppResult<CommandOutput> {
    let store = open_store(common, config)?;
    let result = QueryExecutor::new(&store).execute(statement);
    let opts = create_output_options(common.output_format, common.no_color);
    let output = format_result(&result, &opts);
    Ok(CommandOutput::with_code(result_exit_code(&result), output))
}

/// Report every pipeline stage for a question
pub async fn run_explain(
    question: &str,
    args: &ModelArgs,
    common: &CommonArgs,
    config: &Config
) -> AppResult<CommandOutput> {
    let store = open_store(common, config)?;
    let generator = build_generator(&store, args, config)?;
    let opts = create_output_options(common.output_format, common.no_color);
    let pb = show_spinner(&generator, &opts.format);
    let report = generator.generate_report(question).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(CommandOutput::success(format_report(&report?, &opts)))
}

/// Describe the table and sampled locations
pub fn run_schema(common: &CommonArgs, config: &Config) -> AppResult<CommandOutput> {
    let store = open_store(common, config)?;
    let catalog = SchemaCatalog::load(&store, &config.database.table);
    let opts = create_output_options(common.output_format, common.no_color);
    Ok(CommandOutput::success(format_catalog(&catalog, &opts)))
}

fn show_spinner(generator: &HybridGenerator<'_>, format: &OutputFormat) -> Option<indicatif::ProgressBar> {
    (generator.has_model() && matches!(format, OutputFormat::Text))
        .then(|| spinner("Generating SQL..."))
}
