//! Error types for the symptom advisor.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading the catalog, embedding text or matching queries.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog file was not found at any search location.
    #[error("could not find '{file_name}'; searched: {}", display_paths(.searched))]
    CatalogNotFound {
        file_name: String,
        searched: Vec<PathBuf>,
    },

    /// The catalog yielded no usable entries.
    #[error("catalog contains no usable symptom entries")]
    EmptyCatalog,

    /// The query was blank after trimming.
    #[error("please enter your symptoms first")]
    EmptyQuery,

    /// The embedding provider failed or is unavailable.
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// A vector did not have the dimension the index expects.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The query provider is not the one the index was built with.
    #[error("index was built with model '{index}' but queries use '{provider}'")]
    ModelMismatch { index: String, provider: String },

    /// A query exceeded the configured time budget.
    #[error("query timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The startup task died before producing a service.
    #[error("advisor failed to start: {0}")]
    Startup(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error only affects the current query.
    ///
    /// Anything else raised during startup stops the process. Once the
    /// advisor is serving, every query error is rendered either way.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EmptyQuery | Error::Embedding(_) | Error::Timeout { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_not_found_lists_search_locations() {
        let err = Error::CatalogNotFound {
            file_name: "health_data.csv".to_string(),
            searched: vec![PathBuf::from("/opt/app"), PathBuf::from("/home/user")],
        };
        let msg = err.to_string();
        assert!(msg.contains("health_data.csv"));
        assert!(msg.contains("/opt/app, /home/user"));
    }

    #[test]
    fn test_per_query_errors_are_recoverable() {
        assert!(Error::EmptyQuery.is_recoverable());
        assert!(Error::Embedding("model unavailable".into()).is_recoverable());
        assert!(Error::Timeout { duration_ms: 10 }.is_recoverable());
    }

    #[test]
    fn test_startup_errors_are_fatal() {
        assert!(!Error::EmptyCatalog.is_recoverable());
        assert!(!Error::Config("bad threshold".into()).is_recoverable());
        assert!(!Error::Startup("task panicked".into()).is_recoverable());
        assert!(!Error::CatalogNotFound {
            file_name: "x.csv".into(),
            searched: Vec::new(),
        }
        .is_recoverable());
    }
}
