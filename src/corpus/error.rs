use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::index::IndexError;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// The embedder returned a different number of vectors than it was given sentences.
    #[error("embedder returned {actual} vectors for {expected} sentences")]
    EmbeddingCount { expected: usize, actual: usize },
}

pub type CorpusResult<T> = Result<T, CorpusError>;
