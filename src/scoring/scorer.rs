use tracing::debug;

use crate::lexical::LexicalMetrics;

use super::error::ScoringError;
use super::types::{CompositeScore, ScoringWeights, classify};

#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    weights: ScoringWeights,
}

impl CompositeScorer {
    pub fn new(weights: ScoringWeights) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Weighted sum of the cross-encoder score and the three lexical metrics.
    pub fn composite(&self, cross_score: f32, lexical: &LexicalMetrics) -> f32 {
        let w = &self.weights;
        w.cross_encoder * cross_score
            + w.levenshtein * lexical.levenshtein
            + w.token_jaccard * lexical.jaccard
            + w.ngram_jaccard * lexical.ngram_jaccard
    }

    pub fn score(&self, cross_score: f32, lexical: LexicalMetrics) -> CompositeScore {
        let value = self.composite(cross_score, &lexical);
        let verdict = classify(value);

        debug!(
            composite = value,
            cross_score = cross_score,
            levenshtein = lexical.levenshtein,
            jaccard = lexical.jaccard,
            ngram_jaccard = lexical.ngram_jaccard,
            verdict = verdict.debug_status(),
            "Composite score computed"
        );

        CompositeScore {
            value,
            verdict,
            cross_score,
            lexical,
        }
    }
}

/// Index of the highest score; ties go to the lowest index, NaN never wins.
///
/// Returns `None` for an empty slice or when every score is NaN.
pub fn best_hit_index(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }

    best.map(|(idx, _)| idx)
}
