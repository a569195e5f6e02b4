use std::path::PathBuf;
use thiserror::Error;

/// A source file could not be turned into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported document format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to extract PDF text from {path}: {reason}")]
    Pdf { path: PathBuf, reason: String },

    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
