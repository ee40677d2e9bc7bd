//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.groundwater-sql.toml` in current directory
//! 4. `~/.config/groundwater-sql/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [database]
//! path = "local_data.db"
//! table = "facts_assessment"
//!
//! [llm]
//! provider = "huggingface"     # huggingface, ollama, openai, anthropic
//! model = "tscholak/3vnuv1vf"
//! api_key = "hf_..."           # or use LLM_API_KEY env var
//! base_url = "https://api-inference.huggingface.co/models"
//!
//! [generation]
//! max_length = 256
//! num_beams = 5
//! early_stopping = true
//!
//! [retry]
//! max_retries = 3
//! initial_delay_ms = 1000
//! max_delay_ms = 30000
//! backoff_factor = 2.0
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQLITE_DB_PATH` | SQLite database file |
//! | `LLM_PROVIDER` | Provider name |
//! | `LLM_MODEL` | Model identifier |
//! | `LLM_API_KEY` | API key or access token |
//! | `LLM_BASE_URL` | Base URL for Hugging Face or Ollama |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    columns::TABLE_NAME,
    error::{AppResult, config_error, file_read_error},
    model::GenerationParams
};

/// Local config file name
pub const LOCAL_CONFIG: &str = ".groundwater-sql.toml";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database:   DatabaseConfig,
    #[serde(default)]
    pub llm:        LlmConfig,
    #[serde(default)]
    pub generation: GenerationParams,
    #[serde(default)]
    pub retry:      RetryConfig
}

/// Database location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path:  PathBuf,
    pub table: String
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path:  PathBuf::from("local_data.db"),
            table: String::from(TABLE_NAME)
        }
    }
}

/// Model provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub api_key:  Option<String>,
    pub model:    Option<String>,
    pub base_url: Option<String>
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: String::from("huggingface"),
            api_key:  None,
            model:    None,
            base_url: None
        }
    }
}

/// Retry configuration for model requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries:      u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms:     u64,
    pub backoff_factor:   f64
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries:      3,
            initial_delay_ms: 1000,
            max_delay_ms:     30000,
            backoff_factor:   2.0
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.groundwater-sql.toml)
    /// 3. Config file in home directory (~/.config/groundwater-sql/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("groundwater-sql")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env();
        Ok(config)
    }

    /// Parse a single TOML file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| file_read_error(&path.display().to_string(), e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override fields with environment variables
    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var("SQLITE_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Ok(provider) = env::var("LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = env::var("LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Ok(api_key) = env::var("LLM_API_KEY") {
            self.llm.api_key = Some(api_key);
        }
        if let Ok(url) = env::var("LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
    }
}
