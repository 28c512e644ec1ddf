//! Embedding providers for semantic symptom matching.
//!
//! Provides text-to-vector encoding using:
//! - FastEmbed for pretrained sentence embeddings (ONNX-based, lightweight)
//! - A hashed term-frequency encoder that needs no model download
//! - An in-memory cache for repeated query vectors
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Symptom text   │────▶│ EmbeddingProvider│
//! │ (lowercased)    │     │ (FastEmbed/hash) │
//! └─────────────────┘     └────────┬─────────┘
//!                                  │
//!                                  ▼
//!                          ┌──────────────┐
//!                          │   Embedding  │
//!                          │  [f32; 384]  │
//!                          └──────┬───────┘
//!                                 │
//!                    ┌────────────┴────────────┐
//!                    ▼                         ▼
//!             ┌──────────────┐          ┌──────────────┐
//!             │ CatalogIndex │          │ Query cache  │
//!             │ (built once) │          │   (memory)   │
//!             └──────────────┘          └──────────────┘
//! ```

mod cache;
mod embedding;
mod hashing;

pub use cache::CachedEmbedder;
#[cfg(feature = "semantic-model")]
pub use embedding::{EmbeddingService, EmbeddingServiceConfig};
pub use embedding::{normalize_text, Embedding, EmbeddingProvider};
pub use hashing::HashingEmbedder;

/// Default embedding model (all-MiniLM-L6-v2 - 384 dimensions, good balance of speed/quality)
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Embedding dimension for the default model
pub const EMBEDDING_DIM: usize = 384;
