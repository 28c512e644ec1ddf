//! Feature-hashing embedding provider.
//!
//! Each word, and each pair of neighbouring words, is hashed to a signed slot
//! of a fixed-size vector. Texts that share words score high and texts that
//! share none score zero. Needs no model download, so matching works offline
//! and is reproducible in tests.

use super::{Embedding, EmbeddingProvider};
use crate::error::Result;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Weight of a neighbouring-word pair relative to a single word.
const PAIR_WEIGHT: f32 = 0.5;

/// Deterministic bag-of-words embedder.
pub struct HashingEmbedder {
    dimensions: usize,
    model_id: String,
}

/// FNV-1a over `parts`, separated by a space.
fn fnv1a(parts: &[&str]) -> u64 {
    let bytes = parts.iter().enumerate().flat_map(|(i, part)| {
        let space = if i > 0 { Some(b' ') } else { None };
        space.into_iter().chain(part.bytes())
    });
    bytes.fold(FNV_OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Words of two or more bytes; single letters carry no symptom.
fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.len() >= 2)
        .collect()
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            model_id: format!("hashing-{}", dimensions),
        }
    }

    /// Add `weight` at the slot for `parts`; the top hash bit picks the sign.
    fn add(&self, vector: &mut [f32], parts: &[&str], weight: f32) {
        let h = fnv1a(parts);
        let slot = (h % self.dimensions as u64) as usize;
        if h >> 63 == 0 {
            vector[slot] += weight;
        } else {
            vector[slot] -= weight;
        }
    }

    fn vector(&self, text: &str) -> Embedding {
        let words = words(text);
        let mut vector = vec![0.0f32; self.dimensions];

        for &word in &words {
            // Longer words are rarer and say more about the symptom.
            self.add(&mut vector, &[word], 1.0 + (word.len() as f32).ln());
        }
        for pair in words.windows(2) {
            self.add(&mut vector, pair, PAIR_WEIGHT);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
