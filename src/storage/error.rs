use std::path::PathBuf;
use thiserror::Error;

use crate::constants::DimValidationError;
use crate::index::IndexError;
use crate::storage::mmap::MmapError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No store has been initialized at this location.
    #[error("corpus store missing: {path}")]
    Missing { path: PathBuf },

    #[error("corpus store already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    /// Metadata rows and vectors disagree in count; nothing is published.
    #[error("corpus store inconsistent: {entries} metadata rows vs {vectors} vectors")]
    Inconsistent { entries: usize, vectors: usize },

    #[error("corpus store corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error(transparent)]
    Mmap(#[from] MmapError),

    #[error(transparent)]
    Index(#[from] IndexError),

    /// A reloaded generation does not match the dimension already in use.
    #[error(transparent)]
    Dimension(#[from] DimValidationError),
}

pub type StoreResult<T> = Result<T, StoreError>;
