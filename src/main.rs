//! # groundwater-sql
//!
//! Ask questions about groundwater assessments in plain English.
//!
//! # Quick Start
//!
//! ```bash
//! # Generate SQL with the default model and run it
//! groundwater-sql ask "What is the available groundwater in Tamil Nadu?"
//!
//! # Deterministic rules only, no network
//! groundwater-sql ask --rules-only "rainfall in Coimbatore" -f json
//!
//! # See what every stage produced
//! groundwater-sql explain "What's the water level in Coimbatore?"
//!
//! # Run a statement directly
//! groundwater-sql sql 'SELECT * FROM facts_assessment LIMIT 5;'
//!
//! # Columns and sampled locations
//! groundwater-sql schema
//! ```
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - The statement failed or was rejected, or an error occurred
//!
//! # Logging
//!
//! Logs go to stderr. `RUST_LOG` takes precedence; otherwise `-v` enables
//! info and `-vv` debug output.

use std::process;

use clap::Parser;
use groundwater_sql::{
    app::{run_ask, run_explain, run_schema, run_statement},
    cli::{Cli, Commands},
    config::Config,
    error::{AppResult, error_message}
};
use tokio::main;
use tracing_subscriber::EnvFilter;

#[main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.common().verbose);
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", error_message(&e));
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> AppResult<i32> {
    let config = Config::load()?;
    let result = match &cli.command {
        Commands::Ask {
            question,
            model,
            common
        } => run_ask(question, model, common, &config).await?,
        Commands::Sql {
            statement,
            common
        } => run_statement(statement, common, &config)?,
        Commands::Explain {
            question,
            model,
            common
        } => run_explain(question, model, common, &config).await?,
        Commands::Schema {
            common
        } => run_schema(common, &config)?
    };
    println!("{}", result.output);
    Ok(result.exit_code)
}
