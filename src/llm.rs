//! HTTP model backends for SQL generation.
//!
//! Every backend implements [`SequenceModel`], so the pipeline does not care
//! whether SQL comes from a hosted seq2seq checkpoint or a chat model. The
//! default is the Hugging Face inference API serving the PICARD-tuned
//! T5-small text-to-SQL checkpoint.
//!
//! # Supported Providers
//!
//! | Provider | Endpoint | Authentication |
//! |----------|----------|----------------|
//! | Hugging Face | `api-inference.huggingface.co` (configurable) | Bearer token, optional |
//! | Ollama | Local (configurable) | None |
//! | OpenAI | `api.openai.com` | Bearer token |
//! | Anthropic | `api.anthropic.com` | x-api-key header |
//!
//! # Retry Behavior
//!
//! Transient errors (timeouts, connection failures, 429, 5xx) are retried
//! with exponential backoff configured by [`RetryConfig`].
//!
//! # Example
//!
//! ```
//! use groundwater_sql::{
//!     config::RetryConfig,
//!     llm::{LlmClient, LlmProvider}
//! };
//!
//! let provider = LlmProvider::Ollama {
//!     base_url: "http://localhost:11434".into(),
//!     model:    "sqlcoder".into()
//! };
//!
//! let client = LlmClient::with_retry_config(provider, RetryConfig::default());
//! assert_eq!(client.provider().name(), "ollama");
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::RetryConfig,
    error::{
        AppError, AppResult, config_error, error_message, http_error, llm_api_error,
        model_load_error
    },
    model::{GenerationParams, ModelLoader, SequenceModel}
};

/// Default Hugging Face inference endpoint
pub const HUGGING_FACE_URL: &str = "https://api-inference.huggingface.co/models";

/// Default text-to-SQL checkpoint (PICARD + T5-small)
pub const DEFAULT_MODEL: &str = "tscholak/3vnuv1vf";

/// Default Ollama base URL
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Model backend with its credentials.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// Hugging Face inference API
    HuggingFace {
        base_url: String,
        /// Model repository id (e.g., "tscholak/3vnuv1vf")
        model:    String,
        /// Access token; public models work without one
        api_key:  Option<String>
    },
    /// Local Ollama instance
    Ollama {
        /// Base URL (e.g., "http://localhost:11434")
        base_url: String,
        model:    String
    },
    /// OpenAI API
    OpenAI {
        api_key: String,
        model:   String
    },
    /// Anthropic API
    Anthropic {
        api_key: String,
        model:   String
    }
}

impl LlmProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HuggingFace {
                ..
            } => "huggingface",
            Self::Ollama {
                ..
            } => "ollama",
            Self::OpenAI {
                ..
            } => "openai",
            Self::Anthropic {
                ..
            } => "anthropic"
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::HuggingFace {
                model, ..
            }
            | Self::Ollama {
                model, ..
            }
            | Self::OpenAI {
                model, ..
            }
            | Self::Anthropic {
                model, ..
            } => model
        }
    }
}

/// HTTP client for model APIs with retry support.
pub struct LlmClient {
    provider:     LlmProvider,
    client:       reqwest::Client,
    retry_config: RetryConfig
}

#[derive(Serialize)]
struct HuggingFaceRequest<'a> {
    inputs:     &'a str,
    parameters: HuggingFaceParameters
}

#[derive(Serialize)]
struct HuggingFaceParameters {
    max_length:     u32,
    num_beams:      u32,
    early_stopping: bool
}

#[derive(Deserialize)]
struct HuggingFaceOutput {
    generated_text: String
}

#[derive(Serialize)]
struct OpenAIRequest {
    model:       String,
    messages:    Vec<ChatMessage>,
    max_tokens:  u32,
    temperature: f32
}

#[derive(Serialize)]
struct ChatMessage {
    role:    String,
    content: String
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: String
}

#[derive(Serialize)]
struct AnthropicRequest {
    model:       String,
    max_tokens:  u32,
    temperature: f32,
    messages:    Vec<ChatMessage>
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>
}

#[derive(Deserialize)]
struct AnthropicContent {
    text: String
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model:   &'a str,
    prompt:  &'a str,
    stream:  bool,
    options: OllamaOptions
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String
}

#[derive(Serialize)]
struct OllamaShowRequest<'a> {
    name: &'a str
}

impl LlmClient {
    /// Create new client with default retry configuration
    pub fn new(provider: LlmProvider) -> Self {
        Self::with_retry_config(provider, RetryConfig::default())
    }

    /// Create new client with custom retry configuration
    pub fn with_retry_config(provider: LlmProvider, retry_config: RetryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            provider,
            client,
            retry_config
        }
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    async fn call_with_retry(&self, prompt: &str, params: &GenerationParams) -> AppResult<String> {
        let mut last_error = None;
        let mut delay = self.retry_config.initial_delay_ms;
        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                warn!(
                    "Retrying {} request (attempt {}/{}), waiting {}ms",
                    self.provider.name(),
                    attempt + 1,
                    self.retry_config.max_retries + 1,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
                delay = ((delay as f64 * self.retry_config.backoff_factor) as u64)
                    .min(self.retry_config.max_delay_ms);
            }
            match self.call_provider(prompt, params).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if is_retryable_error(&e) {
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| llm_api_error("All retry attempts failed")))
    }

    async fn call_provider(&self, prompt: &str, params: &GenerationParams) -> AppResult<String> {
        debug!(provider = self.provider.name(), model = self.provider.model(), "Calling model");
        match &self.provider {
            LlmProvider::HuggingFace {
                base_url,
                model,
                api_key
            } => {
                self.call_hugging_face(base_url, model, api_key.as_deref(), prompt, params)
                    .await
            }
            LlmProvider::Ollama {
                base_url,
                model
            } => self.call_ollama(base_url, model, prompt, params).await,
            LlmProvider::OpenAI {
                api_key,
                model
            } => self.call_openai(api_key, model, prompt, params).await,
            LlmProvider::Anthropic {
                api_key,
                model
            } => self.call_anthropic(api_key, model, prompt, params).await
        }
    }

    async fn call_hugging_face(
        &self,
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        prompt: &str,
        params: &GenerationParams
    ) -> AppResult<String> {
        let request = HuggingFaceRequest {
            inputs:     prompt,
            parameters: HuggingFaceParameters {
                max_length:     params.max_length,
                num_beams:      params.num_beams,
                early_stopping: params.early_stopping
            }
        };
        let url = format!("{}/{}", base_url.trim_end_matches('/'), model);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }
        let response = builder.send().await.map_err(http_error)?;
        let response = check_status("Hugging Face", response).await?;
        let result: Vec<HuggingFaceOutput> = response.json().await.map_err(http_error)?;
        result
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .ok_or_else(|| llm_api_error("Empty response from Hugging Face"))
    }

    async fn call_ollama(
        &self,
        base_url: &str,
        model: &str,
        prompt: &str,
        params: &GenerationParams
    ) -> AppResult<String> {
        let request = OllamaRequest {
            model,
            prompt,
            stream: false,
            options: OllamaOptions {
                num_predict: params.max_length,
                temperature: 0.0
            }
        };
        let url = format!("{}/api/generate", base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(http_error)?;
        let response = check_status("Ollama", response).await?;
        let result: OllamaResponse = response.json().await.map_err(http_error)?;
        Ok(result.response)
    }

    async fn call_openai(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        params: &GenerationParams
    ) -> AppResult<String> {
        let request = OpenAIRequest {
            model:       model.to_string(),
            messages:    vec![ChatMessage {
                role:    String::from("user"),
                content: prompt.to_string()
            }],
            max_tokens:  params.max_length,
            temperature: 0.0
        };
        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(http_error)?;
        let response = check_status("OpenAI", response).await?;
        let result: OpenAIResponse = response.json().await.map_err(http_error)?;
        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| llm_api_error("Empty response from OpenAI"))
    }

    async fn call_anthropic(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        params: &GenerationParams
    ) -> AppResult<String> {
        let request = AnthropicRequest {
            model:       model.to_string(),
            max_tokens:  params.max_length,
            temperature: 0.0,
            messages:    vec![ChatMessage {
                role:    String::from("user"),
                content: prompt.to_string()
            }]
        };
        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(http_error)?;
        let response = check_status("Anthropic", response).await?;
        let result: AnthropicResponse = response.json().await.map_err(http_error)?;
        result
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| llm_api_error("Empty response from Anthropic"))
    }

    /// Confirm the local Ollama instance serves the configured model
    async fn ensure_ollama_model(&self, base_url: &str, model: &str) -> AppResult<()> {
        let url = format!("{}/api/show", base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&OllamaShowRequest {
                name: model
            })
            .send()
            .await
            .map_err(|e| model_load_error(error_message(&http_error(e))))?;
        if !response.status().is_success() {
            return Err(model_load_error(format!(
                "Ollama model '{}' is not available ({})",
                model,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SequenceModel for LlmClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> AppResult<String> {
        self.call_with_retry(prompt, params).await
    }
}

/// [`ModelLoader`] producing an [`LlmClient`].
///
/// Loading checks credentials and, for Ollama, that the model is pulled.
pub struct LlmLoader {
    provider:     LlmProvider,
    retry_config: RetryConfig
}

impl LlmLoader {
    pub fn new(provider: LlmProvider, retry_config: RetryConfig) -> Self {
        Self {
            provider,
            retry_config
        }
    }
}

#[async_trait]
impl ModelLoader for LlmLoader {
    async fn load(&self) -> AppResult<Box<dyn SequenceModel>> {
        match &self.provider {
            LlmProvider::OpenAI {
                api_key, ..
            }
            | LlmProvider::Anthropic {
                api_key, ..
            } if api_key.trim().is_empty() => {
                return Err(model_load_error(format!(
                    "API key required for {}",
                    self.provider.name()
                )));
            }
            _ => {}
        }
        let client = LlmClient::with_retry_config(self.provider.clone(), self.retry_config.clone());
        if let LlmProvider::Ollama {
            base_url,
            model
        } = &self.provider
        {
            client.ensure_ollama_model(base_url, model).await?;
        }
        debug!(provider = self.provider.name(), model = self.provider.model(), "Model ready");
        Ok(Box::new(client))
    }
}

/// Build a provider from its name and optional overrides
pub fn build_provider(
    name: &str,
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>
) -> AppResult<LlmProvider> {
    match name.to_lowercase().as_str() {
        "huggingface" | "hf" => Ok(LlmProvider::HuggingFace {
            base_url: base_url.unwrap_or_else(|| HUGGING_FACE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key
        }),
        "ollama" => Ok(LlmProvider::Ollama {
            base_url: base_url.unwrap_or_else(|| OLLAMA_URL.to_string()),
            model:    model.unwrap_or_else(|| String::from("sqlcoder"))
        }),
        "openai" => Ok(LlmProvider::OpenAI {
            api_key: api_key.ok_or_else(|| {
                config_error("API key required for OpenAI (use --api-key or LLM_API_KEY)")
            })?,
            model:   model.unwrap_or_else(|| String::from("gpt-4o-mini"))
        }),
        "anthropic" => Ok(LlmProvider::Anthropic {
            api_key: api_key.ok_or_else(|| {
                config_error("API key required for Anthropic (use --api-key or LLM_API_KEY)")
            })?,
            model:   model.unwrap_or_else(|| String::from("claude-sonnet-4-20250514"))
        }),
        other => Err(config_error(format!("Unknown LLM provider: {}", other)))
    }
}

async fn check_status(name: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(llm_api_error(format!("{} API error {}: {}", name, status, text)))
}

fn is_retryable_error(error: &AppError) -> bool {
    let msg = error_message(error).to_lowercase();
    msg.contains("timeout")
        || msg.contains("connection")
        || msg.contains("429")
        || msg.contains("rate limit")
        || msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("504")
}
