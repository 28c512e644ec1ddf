//! Embedding provider trait and the FastEmbed-backed service.

use crate::error::{Error, Result};

/// A dense text embedding. Its length is fixed per provider.
pub type Embedding = Vec<f32>;

/// Case-fold text before encoding.
///
/// The catalog is embedded lowercased, so queries must be too: two texts that
/// differ only in case are the same input.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

/// Maps text to fixed-length vectors.
///
/// Implementors only encode; the provided `embed`/`embed_batch` methods apply
/// [`normalize_text`] first so every caller sees the same normalisation.
pub trait EmbeddingProvider: Send + Sync {
    /// Encode already-normalised texts, one vector per input, in order.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Length of every vector this provider produces.
    fn dimensions(&self) -> usize;

    /// Identifier of the model configuration. Vectors from providers with
    /// different ids live in different spaces and must not be compared.
    fn model_id(&self) -> &str;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Embedding> {
        let mut vectors = self.encode_batch(&[normalize_text(text)])?;
        if vectors.len() != 1 {
            return Err(Error::Embedding(format!(
                "expected 1 vector, provider returned {}",
                vectors.len()
            )));
        }
        Ok(vectors.remove(0))
    }

    /// Embed several texts in one provider call.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let normalized: Vec<String> = texts.iter().map(|t| normalize_text(t)).collect();
        self.encode_batch(&normalized)
    }
}

#[cfg(feature = "semantic-model")]
pub use self::fastembed_service::{EmbeddingService, EmbeddingServiceConfig};

#[cfg(feature = "semantic-model")]
mod fastembed_service {
    use std::path::PathBuf;

    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use tracing::{debug, info};

    use super::{Embedding, EmbeddingProvider};
    use crate::config::EmbeddingConfig;
    use crate::error::{Error, Result};
    use crate::search::DEFAULT_MODEL;

    /// Settings for loading a pretrained model.
    #[derive(Debug, Clone)]
    pub struct EmbeddingServiceConfig {
        /// Model identifier, e.g. `all-MiniLM-L6-v2`.
        pub model: String,
        /// Where downloaded model files are stored.
        pub cache_dir: Option<PathBuf>,
        pub show_download_progress: bool,
        /// Texts per inference batch.
        pub batch_size: usize,
    }

    impl Default for EmbeddingServiceConfig {
        fn default() -> Self {
            Self {
                model: DEFAULT_MODEL.to_string(),
                cache_dir: None,
                show_download_progress: false,
                batch_size: 256,
            }
        }
    }

    impl From<&EmbeddingConfig> for EmbeddingServiceConfig {
        fn from(config: &EmbeddingConfig) -> Self {
            Self {
                model: config.model.clone(),
                cache_dir: config.cache_dir.clone(),
                show_download_progress: config.show_download_progress,
                batch_size: config.batch_size,
            }
        }
    }

    /// Sentence-embedding model loaded through FastEmbed.
    ///
    /// Inference takes `&self`, so concurrent queries share one session.
    pub struct EmbeddingService {
        model: TextEmbedding,
        model_id: String,
        dimensions: usize,
        batch_size: usize,
    }

    impl EmbeddingService {
        /// Load the default model.
        pub fn new() -> Result<Self> {
            Self::with_config(EmbeddingServiceConfig::default())
        }

        /// Load the configured model, downloading it on first use.
        pub fn with_config(config: EmbeddingServiceConfig) -> Result<Self> {
            let (model, dimensions) = resolve_model(&config.model)?;

            let mut options =
                InitOptions::new(model).with_show_download_progress(config.show_download_progress);
            if let Some(dir) = &config.cache_dir {
                options = options.with_cache_dir(dir.clone());
            }

            let embedding = TextEmbedding::try_new(options).map_err(|e| {
                Error::Embedding(format!("failed to load model '{}': {}", config.model, e))
            })?;

            info!(model = %config.model, dims = dimensions, "Embedding model loaded");

            Ok(Self {
                model: embedding,
                model_id: config.model,
                dimensions,
                batch_size: config.batch_size.max(1),
            })
        }
    }

    impl EmbeddingProvider for EmbeddingService {
        fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            debug!(count = texts.len(), "Encoding texts");

            self.model
                .embed(texts.to_vec(), Some(self.batch_size))
                .map_err(|e| Error::Embedding(e.to_string()))
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }

        fn model_id(&self) -> &str {
            &self.model_id
        }
    }

    /// Map a model identifier to the FastEmbed model and its dimension.
    ///
    /// Hub prefixes such as `sentence-transformers/` are accepted.
    pub(super) fn resolve_model(id: &str) -> Result<(EmbeddingModel, usize)> {
        let name = id.rsplit('/').next().unwrap_or(id).to_ascii_lowercase();
        match name.as_str() {
            "all-minilm-l6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
            "all-minilm-l12-v2" => Ok((EmbeddingModel::AllMiniLML12V2, 384)),
            "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
            "bge-base-en-v1.5" => Ok((EmbeddingModel::BGEBaseENV15, 768)),
            _ => Err(Error::Config(format!(
                "unsupported embedding model '{}' (supported: all-MiniLM-L6-v2, \
                 all-MiniLM-L12-v2, bge-small-en-v1.5, bge-base-en-v1.5)",
                id
            ))),
        }
    }
}
