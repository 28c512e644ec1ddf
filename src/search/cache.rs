//! In-memory query vector cache using moka.
//!
//! Users tend to resubmit the same symptoms; caching the vector skips a model
//! inference. Entries live only for the process lifetime.

use std::sync::Arc;

use moka::sync::Cache;

use super::{Embedding, EmbeddingProvider};
use crate::error::{Error, Result};

/// Wraps a provider and memoises vectors by normalised text.
///
/// Keys are the normalised text; the wrapper reports the inner provider's
/// model id, so a cache is never shared between embedding spaces.
pub struct CachedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Cache<String, Embedding>,
}

impl CachedEmbedder {
    /// Create a cache holding at most `max_entries` vectors.
    pub fn new(inner: Arc<dyn EmbeddingProvider>, max_entries: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_entries),
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner
    }

    /// Drop every cached vector.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl EmbeddingProvider for CachedEmbedder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let mut vectors: Vec<Option<Embedding>> =
            texts.iter().map(|t| self.cache.get(t)).collect();

        let misses: Vec<String> = texts
            .iter()
            .zip(&vectors)
            .filter(|(_, cached)| cached.is_none())
            .map(|(text, _)| text.clone())
            .collect();

        if !misses.is_empty() {
            let computed = self.inner.encode_batch(&misses)?;
            if computed.len() != misses.len() {
                return Err(Error::Embedding(format!(
                    "expected {} vectors, provider returned {}",
                    misses.len(),
                    computed.len()
                )));
            }

            let mut computed = misses.into_iter().zip(computed);
            for slot in vectors.iter_mut().filter(|v| v.is_none()) {
                if let Some((text, vector)) = computed.next() {
                    self.cache.insert(text, vector.clone());
                    *slot = Some(vector);
                }
            }
        }

        Ok(vectors.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
