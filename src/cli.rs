use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Groundwater SQL - Ask questions about groundwater assessments in plain English
#[derive(Parser, Debug)]
#[command(name = "groundwater-sql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate SQL for a question and run it
    Ask {
        /// Natural-language question
        question: String,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        common: CommonArgs
    },
    /// Run a SELECT statement directly
    Sql {
        /// SQL statement
        statement: String,

        #[command(flatten)]
        common: CommonArgs
    },
    /// Show model output, rule output and the accepted SQL for a question
    Explain {
        /// Natural-language question
        question: String,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        common: CommonArgs
    },
    /// Show the table columns and sampled locations
    Schema {
        #[command(flatten)]
        common: CommonArgs
    }
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// SQLite database file
    #[arg(short, long, env = "SQLITE_DB_PATH")]
    pub database: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub output_format: Format,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8
}

/// Model selection options
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Model provider
    #[arg(short, long, value_enum)]
    pub provider: Option<Provider>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key or access token
    #[arg(short, long, env = "LLM_API_KEY")]
    pub api_key: Option<String>,

    /// Base URL for Hugging Face or Ollama
    #[arg(long)]
    pub base_url: Option<String>,

    /// Skip the model and use rule-based generation only
    #[arg(long)]
    pub rules_only: bool
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Provider {
    #[value(name = "huggingface")]
    HuggingFace,
    Ollama,
    #[value(name = "openai")]
    OpenAI,
    Anthropic
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic"
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}

impl Commands {
    /// Options shared by every command
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Ask {
                common, ..
            }
            | Self::Sql {
                common, ..
            }
            | Self::Explain {
                common, ..
            }
            | Self::Schema {
                common
            } => common
        }
    }
}
