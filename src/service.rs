//! Advisor service: the process-wide matching state.
//!
//! [`AdvisorService::initialize`] loads the catalog, loads the embedding
//! provider and builds the index exactly once. After that the service only
//! reads shared state, so one instance can answer concurrent queries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{load_catalog, locate_catalog};
use crate::config::{AdvisorConfig, EmbeddingConfig, ProviderKind};
use crate::error::{Error, Result};
use crate::index::CatalogIndex;
use crate::matcher::{MatchResult, Matcher};
use crate::search::{CachedEmbedder, EmbeddingProvider, HashingEmbedder};

/// Counter of answered queries, labelled by outcome.
pub const QUERIES_METRIC: &str = "advisor_queries_total";

/// Create the embedding provider selected by `config`.
pub fn build_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider {
        ProviderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(config.dimensions))),
        #[cfg(feature = "semantic-model")]
        ProviderKind::Fastembed => {
            let service = crate::search::EmbeddingService::with_config(config.into())?;
            Ok(Arc::new(service))
        }
        #[cfg(not(feature = "semantic-model"))]
        ProviderKind::Fastembed => Err(Error::Config(
            "the fastembed provider requires the 'semantic-model' feature".into(),
        )),
    }
}

/// Shared catalog index, query provider and threshold policy.
pub struct AdvisorService {
    index: Arc<CatalogIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    matcher: Matcher,
    query_timeout: Option<Duration>,
}

impl AdvisorService {
    /// Run the one-time startup sequence.
    ///
    /// Any error here is fatal: no query can be answered without a catalog
    /// index.
    pub fn initialize(config: &AdvisorConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let path = locate_catalog(&config.catalog)?;
        let (entries, _report) = load_catalog(&path)?;

        let provider = build_provider(&config.embedding)?;
        let index = CatalogIndex::build(entries, provider.as_ref())?;

        let embedder: Arc<dyn EmbeddingProvider> = if config.embedding.query_cache_size > 0 {
            Arc::new(CachedEmbedder::new(
                provider,
                config.embedding.query_cache_size,
            ))
        } else {
            provider
        };

        let service = Self::from_parts(
            index,
            embedder,
            Matcher::new(config.matcher.similarity_threshold)?,
        )?
        .with_timeout(config.matcher.query_timeout_ms.map(Duration::from_millis));

        info!(
            catalog = %path.display(),
            entries = service.index.len(),
            threshold = service.matcher.threshold(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Advisor initialized"
        );
        Ok(service)
    }

    /// Run [`initialize`](Self::initialize) on the blocking pool.
    ///
    /// Model loading and catalog embedding block for a while; the async
    /// runtime keeps serving signals meanwhile.
    pub async fn start(config: AdvisorConfig) -> Result<Self> {
        let joined = tokio::task::spawn_blocking(move || Self::initialize(&config)).await;
        flatten_startup(joined)
    }

    /// Assemble a service from an already-built index.
    ///
    /// Fails if `embedder` does not produce vectors in the index's space.
    pub fn from_parts(
        index: CatalogIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        matcher: Matcher,
    ) -> Result<Self> {
        index.ensure_compatible(embedder.as_ref())?;
        Ok(Self {
            index: Arc::new(index),
            embedder,
            matcher,
            query_timeout: None,
        })
    }

    /// Bound each query's embed-and-score step.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Replace the similarity threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Result<Self> {
        self.matcher = Matcher::new(threshold)?;
        Ok(self)
    }

    pub fn index(&self) -> &Arc<CatalogIndex> {
        &self.index
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Answer a query on the calling thread.
    pub fn advise_blocking(&self, query: &str) -> Result<MatchResult> {
        let result = self
            .matcher
            .match_query(query, &self.index, self.embedder.as_ref());
        record_outcome(&result);
        result
    }

    /// Answer a query without blocking the async runtime.
    ///
    /// Embedding and scoring run on the blocking pool. When a timeout is
    /// configured and expires the query fails with `Timeout`; the abandoned
    /// inference still runs to completion in the background.
    pub async fn advise(&self, query: &str) -> Result<MatchResult> {
        let request_id = Uuid::new_v4();

        // Reject blank input before touching the blocking pool.
        if query.trim().is_empty() {
            let result = Err(Error::EmptyQuery);
            record_outcome(&result);
            return result;
        }

        let index = Arc::clone(&self.index);
        let embedder = Arc::clone(&self.embedder);
        let matcher = self.matcher;
        let owned = query.to_string();
        let task = tokio::task::spawn_blocking(move || {
            matcher.match_query(&owned, &index, embedder.as_ref())
        });

        let joined = match self.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(%request_id, timeout_ms = limit.as_millis() as u64, "Query timed out");
                    let result = Err(Error::Timeout {
                        duration_ms: limit.as_millis() as u64,
                    });
                    record_outcome(&result);
                    return result;
                }
            },
            None => task.await,
        };

        let result = joined
            .map_err(|e| Error::Embedding(format!("matching task failed: {}", e)))
            .and_then(|r| r);

        match &result {
            Ok(outcome) => debug!(
                %request_id,
                matched = outcome.is_match(),
                score = outcome.score(),
                "Query answered"
            ),
            Err(e) => warn!(%request_id, "Query failed: {}", e),
        }
        record_outcome(&result);
        result
    }
}

fn flatten_startup<T>(joined: std::result::Result<Result<T>, JoinError>) -> Result<T> {
    joined.map_err(|e| Error::Startup(e.to_string()))?
}

fn record_outcome(result: &Result<MatchResult>) {
    let outcome = match result {
        Ok(MatchResult::Matched { .. }) => "matched",
        Ok(MatchResult::NoMatch { .. }) => "no_match",
        Err(Error::EmptyQuery) => "empty",
        Err(_) => "error",
    };
    metrics::counter!(QUERIES_METRIC, "outcome" => outcome).increment(1);
}
