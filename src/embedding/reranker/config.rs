use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBED_BATCH_SIZE, DEFAULT_MAX_SEQ_LEN};

pub const MAX_SEQ_LEN: usize = DEFAULT_MAX_SEQ_LEN;

#[derive(Debug, Clone)]
pub struct RerankerConfig {
    pub model_path: Option<PathBuf>,

    pub max_seq_len: usize,

    /// Max pairs per forward pass.
    pub batch_size: usize,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: MAX_SEQ_LEN,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

impl RerankerConfig {
    pub const ENV_MODEL_PATH: &'static str = "PLAGIAT_RERANKER_PATH";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.max_seq_len == 0 {
            return Err("max_seq_len must be at least 1".to_string());
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_path,
            ..Default::default()
        }
    }
}
