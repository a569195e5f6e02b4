use thiserror::Error;

use crate::embedding::{EmbeddingError, RerankerError};
use crate::extract::ExtractionError;
use crate::index::IndexError;
use crate::scoring::ScoringError;

/// Fatal analysis failures. Empty documents and fully filtered documents are not
/// errors; see [`AnalysisOutcome`](super::AnalysisOutcome).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Reranker(#[from] RerankerError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("invalid analysis options: {reason}")]
    InvalidOptions { reason: String },

    /// A capability returned a different number of results than it was given inputs.
    #[error("{capability} returned {actual} results for {expected} inputs")]
    ResultCount {
        capability: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The index returned a row the metadata table does not have.
    #[error("index returned row {corpus_id} but the corpus has {len} entries")]
    DanglingHit { corpus_id: usize, len: usize },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
