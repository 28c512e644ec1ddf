//! Advisor configuration.
//!
//! Loaded from a TOML file; every section falls back to its defaults so an
//! empty or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::search::{DEFAULT_MODEL, EMBEDDING_DIM};

/// Default catalog file name looked up at the search locations.
pub const DEFAULT_CATALOG_FILE: &str = "health_data.csv";

/// Default similarity threshold a match must strictly exceed.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.65;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub catalog: CatalogConfig,
    pub embedding: EmbeddingConfig,
    pub matcher: MatcherConfig,
}

/// Where the catalog lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Explicit catalog path. When set, no other location is searched.
    pub path: Option<PathBuf>,
    /// File name searched next to the executable and in the working directory.
    pub file_name: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            file_name: DEFAULT_CATALOG_FILE.to_string(),
        }
    }
}

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Pretrained sentence-embedding model.
    #[default]
    Fastembed,
    /// Hashed term-frequency vectors, no model download.
    Hashing,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    /// Pretrained model identifier (fastembed provider).
    pub model: String,
    /// Vector dimension (hashing provider).
    pub dimensions: usize,
    pub show_download_progress: bool,
    /// Directory for downloaded model files.
    pub cache_dir: Option<PathBuf>,
    /// Batch size for catalog embedding.
    pub batch_size: usize,
    /// Number of query vectors kept in memory. 0 disables the cache.
    pub query_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: EMBEDDING_DIM,
            show_download_progress: false,
            cache_dir: None,
            batch_size: 256,
            query_cache_size: 1024,
        }
    }
}

/// Matching policy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum cosine similarity a match must strictly exceed.
    pub similarity_threshold: f32,
    /// Optional per-query time budget in milliseconds.
    pub query_timeout_ms: Option<u64>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            query_timeout_ms: None,
        }
    }
}

impl AdvisorConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AdvisorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Reject values that would make matching meaningless.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.matcher.similarity_threshold)?;

        if self.catalog.path.is_none() && self.catalog.file_name.trim().is_empty() {
            return Err(Error::Config(
                "catalog.file_name must not be empty when catalog.path is unset".into(),
            ));
        }
        if self.embedding.provider == ProviderKind::Fastembed
            && self.embedding.model.trim().is_empty()
        {
            return Err(Error::Config("embedding.model must not be empty".into()));
        }
        if self.embedding.dimensions == 0 {
            return Err(Error::Config("embedding.dimensions must be positive".into()));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::Config("embedding.batch_size must be positive".into()));
        }
        if self.matcher.query_timeout_ms == Some(0) {
            return Err(Error::Config(
                "matcher.query_timeout_ms must be positive when set".into(),
            ));
        }
        Ok(())
    }
}

/// Thresholds outside the cosine range can never (or always) match.
pub fn validate_threshold(threshold: f32) -> Result<()> {
    if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
        return Err(Error::Config(format!(
            "similarity_threshold must be within [-1.0, 1.0], got {}",
            threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.matcher.similarity_threshold, 0.65);
        assert_eq!(config.embedding.model, "all-MiniLM-L6-v2");
        assert_eq!(config.embedding.provider, ProviderKind::Fastembed);
        assert_eq!(config.catalog.file_name, "health_data.csv");
        assert!(config.catalog.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");

        let mut config = AdvisorConfig::default();
        config.matcher.similarity_threshold = 0.8;
        config.matcher.query_timeout_ms = Some(2_000);
        config.embedding.provider = ProviderKind::Hashing;
        config.catalog.path = Some(PathBuf::from("/data/health_data.csv"));
        config.save(&path).unwrap();

        let loaded = AdvisorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AdvisorConfig = toml::from_str(
            r#"
            [matcher]
            similarity_threshold = 0.5

            [embedding]
            provider = "hashing"
            "#,
        )
        .unwrap();

        assert_eq!(config.matcher.similarity_threshold, 0.5);
        assert_eq!(config.embedding.provider, ProviderKind::Hashing);
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.catalog.file_name, "health_data.csv");
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let mut config = AdvisorConfig::default();
        config.matcher.similarity_threshold = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.matcher.similarity_threshold = f32::NAN;
        assert!(config.validate().is_err());

        config.matcher.similarity_threshold = -1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_sizes() {
        let mut config = AdvisorConfig::default();
        config.embedding.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = AdvisorConfig::default();
        config.matcher.query_timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        std::fs::write(&path, "[matcher]\nsimilarity_threshold = 3.0\n").unwrap();

        assert!(matches!(AdvisorConfig::load(&path), Err(Error::Config(_))));
    }
}
