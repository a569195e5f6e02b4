//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is fixed per corpus: every vector in the index and every
//! query vector must share it. [`DEFAULT_EMBEDDING_DIM`] matches the DistilBERT-class
//! bi-encoders the corpus is normally built with; stores record their own dimension
//! and [`validate_embedding_dim`] is used at module boundaries to catch mismatches.

/// Output dimension of the default bi-encoder.
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Token budget for both the bi-encoder and the cross-encoder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Number of nearest corpus rows retrieved per candidate sentence.
pub const DEFAULT_TOP_K: usize = 20;

/// Findings below this composite score are dropped from the report.
pub const DEFAULT_MIN_VERDICT_SCORE: f32 = 0.6;

/// Composite score lower bound for [`Verdict::NearIdentical`](crate::scoring::Verdict::NearIdentical).
pub const NEAR_IDENTICAL_THRESHOLD: f32 = 0.85;
/// Composite score lower bound for [`Verdict::StrongParaphrase`](crate::scoring::Verdict::StrongParaphrase).
pub const STRONG_PARAPHRASE_THRESHOLD: f32 = 0.70;
/// Composite score lower bound for [`Verdict::ThematicSimilarity`](crate::scoring::Verdict::ThematicSimilarity).
pub const THEMATIC_SIMILARITY_THRESHOLD: f32 = 0.60;

/// Weight of the cross-encoder score in the composite.
///
/// The four weights sum to 1.10. This is the observed production formula and is kept
/// as-is; [`ScoringWeights`](crate::scoring::ScoringWeights) makes it overridable.
pub const WEIGHT_CROSS_ENCODER: f32 = 0.65;
/// Weight of the Levenshtein ratio in the composite.
pub const WEIGHT_LEVENSHTEIN: f32 = 0.15;
/// Weight of the token Jaccard in the composite.
pub const WEIGHT_TOKEN_JACCARD: f32 = 0.15;
/// Weight of the n-gram Jaccard in the composite.
pub const WEIGHT_NGRAM_JACCARD: f32 = 0.15;

/// Window size used for the n-gram Jaccard signal.
pub const COMPOSITE_NGRAM_SIZE: usize = 3;

/// Sentences with fewer tokens than this are never analyzed.
pub const MIN_ANALYZABLE_TOKENS: usize = 5;

/// Ingest keeps sentences with strictly more tokens than this.
pub const DEFAULT_MIN_SENTENCE_TOKENS: usize = 10;

/// Staged files smaller than this are archived without processing.
pub const DEFAULT_MIN_FILE_BYTES: u64 = 10_000;

/// Max sentences per embedder call.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 64;

/// Runtime dimension configuration for modules that must agree on vector size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Rejects a zero dimension.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }
}

/// Errors from dimension validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    /// Dimension is zero.
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,

    /// Vector length does not match the expected dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Mismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}

/// Checks that `actual` matches `expected`.
#[inline]
pub fn validate_embedding_dim(expected: usize, actual: usize) -> Result<(), DimValidationError> {
    if expected != actual {
        return Err(DimValidationError::Mismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_config_rejects_zero() {
        assert_eq!(
            DimConfig::new(0).validate(),
            Err(DimValidationError::ZeroDimension)
        );
        assert!(DimConfig::new(384).validate().is_ok());
    }

    #[test]
    fn test_validate_embedding_dim() {
        assert!(validate_embedding_dim(768, 768).is_ok());
        assert_eq!(
            validate_embedding_dim(768, 384),
            Err(DimValidationError::Mismatch {
                expected: 768,
                actual: 384
            })
        );
    }

    #[test]
    fn test_verdict_bands_are_ordered() {
        assert!(THEMATIC_SIMILARITY_THRESHOLD < STRONG_PARAPHRASE_THRESHOLD);
        assert!(STRONG_PARAPHRASE_THRESHOLD < NEAR_IDENTICAL_THRESHOLD);
        assert_eq!(DEFAULT_MIN_VERDICT_SCORE, THEMATIC_SIMILARITY_THRESHOLD);
    }
}
