//! Test doubles shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::catalog::CatalogEntry;
use crate::error::{Error, Result};
use crate::search::{Embedding, EmbeddingProvider};

pub(crate) fn entry(symptom: &str, advice: &str) -> CatalogEntry {
    CatalogEntry::new(symptom, advice).expect("test entry needs a symptom")
}

/// Returns fixed vectors per (normalised) text; unknown text maps to zeros.
pub(crate) struct StaticEmbedder {
    dimensions: usize,
    vectors: HashMap<String, Embedding>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticEmbedder {
    pub(crate) fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: HashMap::new(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails as if the model were unavailable.
    pub(crate) fn failing(dimensions: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(dimensions)
        }
    }

    pub(crate) fn with(mut self, text: &str, vector: Embedding) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Number of `encode_batch` calls so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for StaticEmbedder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Embedding("model unavailable".into()));
        }
        Ok(texts
            .iter()
            .map(|t| {
                self.vectors
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; self.dimensions])
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        "static"
    }
}
