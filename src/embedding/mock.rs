use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CrossEncoder, Embedder, EmbeddingError, RerankerError};

/// Cross-encoder returning a fixed score per query sentence.
#[derive(Debug, Default)]
pub struct MockCrossEncoder {
    scores: HashMap<String, f32>,
    default: f32,
    calls: AtomicUsize,
}

impl MockCrossEncoder {
    /// Scores every pair `default`.
    pub fn uniform(default: f32) -> Self {
        Self {
            default,
            ..Default::default()
        }
    }

    /// Scores pairs whose query is `query` with `score` instead of the default.
    pub fn with_score(mut self, query: impl Into<String>, score: f32) -> Self {
        self.scores.insert(query.into(), score);
        self
    }

    /// Number of `score_pairs` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl CrossEncoder for MockCrossEncoder {
    fn score_pairs(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, RerankerError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(pairs
            .iter()
            .map(|(q, _)| self.scores.get(*q).copied().unwrap_or(self.default))
            .collect())
    }
}

/// Embedder that always fails, for error-path tests.
#[derive(Debug, Clone, Copy)]
pub struct FailingEmbedder {
    pub dimension: usize,
}

impl Embedder for FailingEmbedder {
    fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "mock embedder failure".to_string(),
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cross-encoder that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCrossEncoder;

impl CrossEncoder for FailingCrossEncoder {
    fn score_pairs(&self, _pairs: &[(&str, &str)]) -> Result<Vec<f32>, RerankerError> {
        Err(RerankerError::InferenceFailed {
            reason: "mock reranker failure".to_string(),
        })
    }
}
