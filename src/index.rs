//! Catalog index: one precomputed vector per catalog entry.

use std::time::Instant;
use tracing::info;

use crate::catalog::CatalogEntry;
use crate::error::{Error, Result};
use crate::search::{Embedding, EmbeddingProvider};

/// A catalog entry paired with its symptom vector.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    pub entry: CatalogEntry,
    pub vector: Embedding,
}

/// Read-only, non-empty set of embedded catalog entries in catalog order.
///
/// Built once before any query is served and shared between queries
/// (typically behind an `Arc`) without locking.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    entries: Vec<IndexedEntry>,
    model_id: String,
    dimensions: usize,
}

impl CatalogIndex {
    /// Embed every entry's lowercased symptom text in a single batch call.
    ///
    /// # Errors
    ///
    /// - `EmptyCatalog` if `entries` is empty
    /// - `Embedding` if the provider fails or returns the wrong number of vectors
    /// - `DimensionMismatch` if a vector disagrees with the provider's dimension
    pub fn build(entries: Vec<CatalogEntry>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let start = Instant::now();
        let texts: Vec<&str> = entries.iter().map(|e| e.symptom_text.as_str()).collect();
        let vectors = embedder.embed_batch(&texts)?;

        if vectors.len() != entries.len() {
            return Err(Error::Embedding(format!(
                "expected {} catalog vectors, provider returned {}",
                entries.len(),
                vectors.len()
            )));
        }

        let dimensions = embedder.dimensions();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(Error::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            });
        }

        let entries: Vec<IndexedEntry> = entries
            .into_iter()
            .zip(vectors)
            .map(|(entry, vector)| IndexedEntry { entry, vector })
            .collect();

        info!(
            entries = entries.len(),
            model = embedder.model_id(),
            dims = dimensions,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Catalog index built"
        );

        Ok(Self {
            entries,
            model_id: embedder.model_id().to_string(),
            dimensions,
        })
    }

    /// Ensure `embedder` produces vectors in this index's space.
    pub fn ensure_compatible(&self, embedder: &dyn EmbeddingProvider) -> Result<()> {
        if embedder.model_id() != self.model_id {
            return Err(Error::ModelMismatch {
                index: self.model_id.clone(),
                provider: embedder.model_id().to_string(),
            });
        }
        if embedder.dimensions() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: embedder.dimensions(),
            });
        }
        Ok(())
    }

    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&IndexedEntry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; construction rejects empty catalogs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Model the vectors were computed with.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}
