//! Symptom Advisor
//!
//! Matches a free-text description of symptoms against a fixed catalog of
//! symptom/advice pairs using sentence-embedding cosine similarity, and
//! returns the best entry's advice when it is similar enough.
//!
//! ```text
//! catalog CSV ──▶ CatalogIndex (built once)
//! query ──▶ EmbeddingProvider ──▶ Matcher ──▶ MatchResult ──▶ Answer
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod presenter;
pub mod search;
pub mod service;

#[cfg(test)]
mod testing;

pub use catalog::{load_catalog, locate_catalog, parse_catalog, CatalogEntry, LoadReport};
pub use config::{AdvisorConfig, CatalogConfig, EmbeddingConfig, MatcherConfig, ProviderKind};
pub use error::{Error, Result};
pub use index::{CatalogIndex, IndexedEntry};
pub use matcher::{cosine_similarity, MatchResult, Matcher};
pub use presenter::{present, Answer};
#[cfg(feature = "semantic-model")]
pub use search::{EmbeddingService, EmbeddingServiceConfig};
pub use search::{CachedEmbedder, Embedding, EmbeddingProvider, HashingEmbedder};
pub use service::{build_provider, AdvisorService};
