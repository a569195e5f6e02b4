use std::path::PathBuf;
use thiserror::Error;

use crate::corpus::CorpusError;

/// Run-level maintenance failures. Per-file problems are not errors; they are
/// recorded as [`FileFailure`](super::FileFailure)s.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid ingest configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
