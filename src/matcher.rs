//! Similarity scoring and the match decision.
//!
//! A query is embedded, scored against every indexed entry with cosine
//! similarity, and the best entry is returned only if its score strictly
//! exceeds the threshold. Ties go to the entry that comes first in the catalog.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::catalog::CatalogEntry;
use crate::config::{validate_threshold, DEFAULT_SIMILARITY_THRESHOLD};
use crate::error::{Error, Result};
use crate::index::CatalogIndex;
use crate::search::EmbeddingProvider;

/// Catalog size from which scoring is spread over the rayon pool.
pub const PARALLEL_SCORING_MIN_ENTRIES: usize = 1024;

/// Outcome of matching one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    /// The best entry cleared the threshold.
    Matched { entry: CatalogEntry, score: f32 },
    /// Nothing cleared the threshold. `best_score` is kept for diagnostics.
    NoMatch { best_score: f32 },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    /// Score of the best candidate, matched or not.
    pub fn score(&self) -> f32 {
        match self {
            MatchResult::Matched { score, .. } => *score,
            MatchResult::NoMatch { best_score } => *best_score,
        }
    }
}

/// Cosine similarity, or 0 when either vector has zero norm.
///
/// Vectors of different lengths live in different spaces and also score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    let score = dot / denom;
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Score `query` against every entry, in catalog order.
pub fn score_all(query: &[f32], index: &CatalogIndex) -> Vec<f32> {
    let entries = index.entries();
    if entries.len() >= PARALLEL_SCORING_MIN_ENTRIES {
        entries
            .par_iter()
            .map(|e| cosine_similarity(query, &e.vector))
            .collect()
    } else {
        entries
            .iter()
            .map(|e| cosine_similarity(query, &e.vector))
            .collect()
    }
}

/// Position and value of the highest score; the first one wins a tie.
pub fn select_best(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (position, &score) in scores.iter().enumerate() {
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((position, score)),
        }
    }
    best
}

/// Applies the threshold policy to catalog scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    threshold: f32,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl Matcher {
    /// Create a matcher. Higher thresholds give fewer, more confident matches.
    pub fn new(threshold: f32) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Match a free-text query.
    ///
    /// Blank queries fail with `EmptyQuery` before the provider is called.
    pub fn match_query(
        &self,
        query: &str,
        index: &CatalogIndex,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<MatchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        index.ensure_compatible(embedder)?;
        let vector = embedder.embed(query)?;
        if vector.len() != index.dimensions() {
            // A compatible provider returned a vector of the wrong length.
            return Err(Error::Embedding(format!(
                "query vector has {} dimensions, index expects {}",
                vector.len(),
                index.dimensions()
            )));
        }

        Ok(self.match_vector(&vector, index))
    }

    /// Match an already-embedded query.
    pub fn match_vector(&self, query: &[f32], index: &CatalogIndex) -> MatchResult {
        let scores = score_all(query, index);
        // A built index is never empty, so there is always a best entry.
        let (position, best_score) = select_best(&scores).unwrap_or((0, 0.0));

        debug!(
            position,
            best_score,
            threshold = self.threshold,
            "Best catalog candidate"
        );

        match index.get(position) {
            Some(best) if best_score > self.threshold => MatchResult::Matched {
                entry: best.entry.clone(),
                score: best_score,
            },
            _ => MatchResult::NoMatch { best_score },
        }
    }
}
