use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBED_BATCH_SIZE, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

/// Configuration for [`BiEncoder`](super::BiEncoder).
#[derive(Debug, Clone)]
pub struct BiEncoderConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` selects stub mode.
    pub model_path: Option<PathBuf>,
    /// Max tokens per sentence; longer input is truncated.
    pub max_seq_len: usize,
    /// Output dimension in stub mode. A loaded model reports its own hidden size.
    pub stub_dimension: usize,
    /// Max sentences per forward pass.
    pub batch_size: usize,
}

impl Default for BiEncoderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            stub_dimension: DEFAULT_EMBEDDING_DIM,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

impl BiEncoderConfig {
    pub const ENV_MODEL_PATH: &'static str = "PLAGIAT_EMBEDDER_PATH";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_stub_dimension(mut self, dimension: usize) -> Self {
        self.stub_dimension = dimension;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn is_stub(&self) -> bool {
        self.model_path.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "batch_size must be at least 1".to_string(),
            });
        }
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be at least 1".to_string(),
            });
        }
        if self.is_stub() && self.stub_dimension == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub_dimension must be at least 1".to_string(),
            });
        }
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_path cannot be empty when provided".to_string(),
            });
        }
        Ok(())
    }

    /// Reads the model directory from [`Self::ENV_MODEL_PATH`]; unset or blank means stub.
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
