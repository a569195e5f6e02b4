use crate::constants::{DEFAULT_MIN_VERDICT_SCORE, DEFAULT_TOP_K};
use crate::scoring::ScoringWeights;

use super::error::{AnalysisError, AnalysisResult};

/// Per-call knobs of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Corpus rows retrieved per candidate sentence.
    pub top_k: usize,
    /// Findings scoring below this are dropped.
    pub min_verdict_score: f32,
    pub weights: ScoringWeights,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_verdict_score: DEFAULT_MIN_VERDICT_SCORE,
            weights: ScoringWeights::default(),
        }
    }
}

impl AnalysisOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_verdict_score(mut self, min_verdict_score: f32) -> Self {
        self.min_verdict_score = min_verdict_score;
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if self.top_k == 0 {
            return Err(AnalysisError::InvalidOptions {
                reason: "top_k must be at least 1".to_string(),
            });
        }
        if !self.min_verdict_score.is_finite() {
            return Err(AnalysisError::InvalidOptions {
                reason: format!(
                    "min_verdict_score must be finite, got {}",
                    self.min_verdict_score
                ),
            });
        }
        self.weights.validate()?;
        Ok(())
    }
}
