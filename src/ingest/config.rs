use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_EMBED_BATCH_SIZE, DEFAULT_MIN_FILE_BYTES, DEFAULT_MIN_SENTENCE_TOKENS,
};

use super::error::{IngestError, IngestResult};

/// Name of the error directory created under staging when none is configured.
pub const DEFAULT_ERROR_DIR_NAME: &str = "errors";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where staged documents come from and go to, and how they are filtered.
pub struct IngestConfig {
    /// Directory scanned for new documents.
    pub staging_dir: PathBuf,
    /// Successfully ingested (and too small) documents end up here.
    pub archive_dir: PathBuf,
    /// Documents that failed to process end up here.
    pub error_dir: PathBuf,
    /// Files smaller than this are archived untouched.
    pub min_file_bytes: u64,
    /// Sentences need strictly more whitespace tokens than this.
    pub min_sentence_tokens: usize,
    /// Drop sentences that look like formulas.
    pub skip_math_sentences: bool,
    /// Max sentences per embedder call.
    pub embed_batch_size: usize,
}

impl IngestConfig {
    pub fn new(staging_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        let staging_dir = staging_dir.into();
        Self {
            error_dir: staging_dir.join(DEFAULT_ERROR_DIR_NAME),
            staging_dir,
            archive_dir: archive_dir.into(),
            min_file_bytes: DEFAULT_MIN_FILE_BYTES,
            min_sentence_tokens: DEFAULT_MIN_SENTENCE_TOKENS,
            skip_math_sentences: false,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }

    pub fn with_error_dir(mut self, error_dir: impl Into<PathBuf>) -> Self {
        self.error_dir = error_dir.into();
        self
    }

    pub fn with_min_file_bytes(mut self, min_file_bytes: u64) -> Self {
        self.min_file_bytes = min_file_bytes;
        self
    }

    pub fn with_min_sentence_tokens(mut self, min_sentence_tokens: usize) -> Self {
        self.min_sentence_tokens = min_sentence_tokens;
        self
    }

    pub fn with_skip_math_sentences(mut self, skip: bool) -> Self {
        self.skip_math_sentences = skip;
        self
    }

    pub fn with_embed_batch_size(mut self, embed_batch_size: usize) -> Self {
        self.embed_batch_size = embed_batch_size;
        self
    }

    /// Rejects a zero batch size and an archive that is the staging directory itself.
    pub fn validate(&self) -> IngestResult<()> {
        if self.embed_batch_size == 0 {
            return Err(IngestError::InvalidConfig {
                reason: "embed_batch_size must be at least 1".to_string(),
            });
        }
        if same_dir(&self.staging_dir, &self.archive_dir) {
            return Err(IngestError::InvalidConfig {
                reason: format!(
                    "archive dir {} must differ from the staging dir",
                    self.archive_dir.display()
                ),
            });
        }
        if same_dir(&self.staging_dir, &self.error_dir) {
            return Err(IngestError::InvalidConfig {
                reason: format!(
                    "error dir {} must differ from the staging dir",
                    self.error_dir.display()
                ),
            });
        }
        Ok(())
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
