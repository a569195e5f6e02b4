//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Retrieval depth of zero.
    #[error("invalid top-k '{value}': must be at least 1")]
    InvalidTopK { value: String },

    /// Top-k string could not be parsed as a number.
    #[error("failed to parse top-k '{value}': {source}")]
    TopKParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Minimum verdict score outside `[0, 1]` or not finite.
    #[error("invalid minimum verdict score '{value}': must be between 0 and 1")]
    InvalidMinScore { value: String },

    /// Minimum verdict score string could not be parsed.
    #[error("failed to parse minimum verdict score '{value}': {source}")]
    MinScoreParseError {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("embed batch size must be at least 1")]
    InvalidBatchSize,

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Two directories that must differ resolve to the same place.
    #[error("{what} must not be the staging directory: {path}")]
    OverlappingDirs { what: &'static str, path: PathBuf },
}
