use std::path::PathBuf;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::config::ConfigError;
use crate::constants::DimValidationError;
use crate::embedding::{EmbeddingError, RerankerError};
use crate::ingest::IngestError;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum ContextError {
    /// A resource the service cannot run without is absent.
    #[error("{resource} missing at {path}")]
    MissingResource {
        resource: &'static str,
        path: PathBuf,
    },

    /// The embedder and the corpus disagree on vector size.
    #[error("embedder does not match the corpus: {0}")]
    Dimension(#[from] DimValidationError),

    #[error("service context has been shut down")]
    ShutDown,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Reranker(#[from] RerankerError),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<StoreError> for ContextError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing { path } => ContextError::MissingResource {
                resource: "corpus store",
                path,
            },
            other => ContextError::Store(other),
        }
    }
}

pub type ContextResult<T> = Result<T, ContextError>;
