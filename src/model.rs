//! Model-based SQL generation.
//!
//! A [`ModelBasedGenerator`] renders an instruction prompt for a question and
//! decodes it with a sequence model. The model itself is an external
//! collaborator behind the [`SequenceModel`] trait; it is obtained through a
//! [`ModelHandle`] that loads it on first use and can be torn down again.
//!
//! Output is returned verbatim apart from code-fence stripping. Validation
//! and repair happen later in the pipeline.

mod prompt;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

pub use prompt::{build_prompt, strip_code_fences};

use crate::{catalog::SchemaCatalog, error::AppResult};

/// Decoding parameters forwarded to the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Maximum output length in tokens
    pub max_length:     u32,
    /// Beam width
    pub num_beams:      u32,
    pub early_stopping: bool
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length:     256,
            num_beams:      5,
            early_stopping: true
        }
    }
}

/// Sequence-to-sequence model: prompt in, decoded text out.
#[async_trait]
pub trait SequenceModel: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> AppResult<String>;
}

/// Produces a ready model. Called at most once per successful load.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> AppResult<Box<dyn SequenceModel>>;
}

/// Lazily initialized model owned by its generator.
///
/// A failed load leaves the handle empty so the next call tries again.
pub struct ModelHandle {
    loader: Box<dyn ModelLoader>,
    model:  OnceCell<Box<dyn SequenceModel>>
}

impl ModelHandle {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            model:  OnceCell::new()
        }
    }

    /// Loaded model, loading it on first call
    pub async fn get(&self) -> AppResult<&dyn SequenceModel> {
        let model = self
            .model
            .get_or_try_init(|| async {
                info!("Loading text-to-SQL model");
                self.loader.load().await
            })
            .await?;
        Ok(&**model)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Drop the loaded model; the next [`get`](Self::get) reloads it
    pub fn unload(&mut self) {
        if self.model.take().is_some() {
            info!("Unloaded text-to-SQL model");
        }
    }
}

/// Prompted text-to-SQL generation through a [`ModelHandle`].
pub struct ModelBasedGenerator {
    handle:  ModelHandle,
    catalog: SchemaCatalog,
    params:  GenerationParams
}

impl ModelBasedGenerator {
    pub fn new(handle: ModelHandle, catalog: SchemaCatalog) -> Self {
        Self::with_params(handle, catalog, GenerationParams::default())
    }

    pub fn with_params(handle: ModelHandle, catalog: SchemaCatalog, params: GenerationParams) -> Self {
        Self {
            handle,
            catalog,
            params
        }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut ModelHandle {
        &mut self.handle
    }

    pub fn build_prompt(&self, question: &str) -> String {
        build_prompt(question, &self.catalog)
    }

    /// Decode SQL for a question. Load and inference errors propagate.
    pub async fn generate(&self, question: &str) -> AppResult<String> {
        let model = self.handle.get().await?;
        let prompt = self.build_prompt(question);
        let raw = model.generate(&prompt, &self.params).await?;
        let sql = strip_code_fences(&raw);
        debug!(raw = %sql, "Model generated SQL");
        Ok(sql)
    }
}
