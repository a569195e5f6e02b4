//! Bi-encoder: maps sentences independently to unit-length vectors for retrieval.
//!
//! Loads any BERT-family checkpoint exported in the Hugging Face layout and mean-pools
//! the last hidden state under the attention mask. Without a model path it runs in
//! stub mode, producing deterministic vectors from hashed tokens so tests and local
//! runs need no model files.

pub mod config;


pub use config::BiEncoderConfig;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::Embedder;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{l2_normalize, load_batch_tokenizer};

enum EncoderBackend {
    Model {
        model: BertEncoder,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub {
        dimension: usize,
    },
}

/// Sentence embedder backed by a BERT model or the deterministic stub.
pub struct BiEncoder {
    backend: EncoderBackend,
    config: BiEncoderConfig,
}

impl std::fmt::Debug for BiEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({})", device_label(device)),
                    EncoderBackend::Stub { .. } => "Stub".to_string(),
                },
            )
            .field("dimension", &self.dimension())
            .field("batch_size", &self.config.batch_size)
            .finish()
    }
}

impl BiEncoder {
    pub fn load(config: BiEncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_path) = config.model_path.clone() else {
            warn!(
                dimension = config.stub_dimension,
                "No embedder model configured, running in stub mode"
            );
            return Ok(Self {
                backend: EncoderBackend::Stub {
                    dimension: config.stub_dimension,
                },
                config,
            });
        };

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_path.join(required).exists() {
                return Err(EmbeddingError::ModelNotFound {
                    path: model_path.join(required),
                });
            }
        }

        let device = select_device()?;
        let model = BertEncoder::load(&model_path, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load BERT encoder: {e}"),
            }
        })?;
        let tokenizer = load_batch_tokenizer(&model_path, config.max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("failed to load tokenizer: {e}"),
            }
        })?;

        info!(
            model_path = %model_path.display(),
            device = device_label(&device),
            dimension = model.hidden_size(),
            max_seq_len = config.max_seq_len,
            "Bi-encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(BiEncoderConfig::stub())
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub { .. })
    }

    pub fn config(&self) -> &BiEncoderConfig {
        &self.config
    }

    fn embed_chunk_with_model(
        texts: &[&str],
        model: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let mut ids = Vec::with_capacity(encodings.len());
        let mut type_ids = Vec::with_capacity(encodings.len());
        let mut masks = Vec::with_capacity(encodings.len());
        for encoding in &encodings {
            ids.push(Tensor::new(encoding.get_ids(), device)?);
            type_ids.push(Tensor::new(encoding.get_type_ids(), device)?);
            masks.push(Tensor::new(encoding.get_attention_mask(), device)?);
        }

        let input_ids = Tensor::stack(&ids, 0)?;
        let token_type_ids = Tensor::stack(&type_ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;

        let pooled = model.forward_pooled(&input_ids, &token_type_ids, &attention_mask)?;
        let mut vectors = pooled.to_vec2::<f32>()?;
        for v in &mut vectors {
            l2_normalize(v);
        }
        Ok(vectors)
    }

    /// Sum of per-token pseudo-random vectors seeded by blake3, normalized.
    ///
    /// Identical sentences map to identical vectors and shared tokens pull vectors
    /// together, which is enough for retrieval to behave sensibly in tests.
    fn embed_stub(text: &str, dimension: usize) -> Vec<f32> {
        let mut embedding = vec![0.0f32; dimension];

        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            let digest = blake3::hash(token.as_bytes());
            let mut seed = [0u8; 8];
            seed.copy_from_slice(&digest.as_bytes()[..8]);
            let mut state = u64::from_le_bytes(seed);

            for slot in embedding.iter_mut() {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                *slot += ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            }
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl Embedder for BiEncoder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            sentences = texts.len(),
            batch_size = self.config.batch_size,
            stub = self.is_stub(),
            "Embedding sentences"
        );

        match &self.backend {
            EncoderBackend::Stub { dimension } => Ok(texts
                .iter()
                .map(|text| Self::embed_stub(text, *dimension))
                .collect()),
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => {
                let mut out = Vec::with_capacity(texts.len());
                for chunk in texts.chunks(self.config.batch_size) {
                    out.extend(Self::embed_chunk_with_model(chunk, model, tokenizer, device)?);
                }
                Ok(out)
            }
        }
    }

    fn dimension(&self) -> usize {
        match &self.backend {
            EncoderBackend::Model { model, .. } => model.hidden_size(),
            EncoderBackend::Stub { dimension } => *dimension,
        }
    }
}
