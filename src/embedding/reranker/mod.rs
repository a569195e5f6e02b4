//! Cross-encoder reranker.
//!
//! Scores (suspect sentence, corpus sentence) pairs jointly. A loaded model's single
//! logit goes through a sigmoid so scores land in (0, 1). Without a model the reranker
//! falls back to a lexical placeholder on the same scale.

pub mod config;
pub mod error;


pub use config::{MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use std::collections::HashSet;
use std::sync::LazyLock;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::CrossEncoder;
use crate::embedding::bert::BertClassifier;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::utils::load_batch_tokenizer;

/// Stop words ignored by the placeholder score (French and English).
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // fr
        "le", "la", "les", "l", "un", "une", "des", "du", "de", "d", "au", "aux", "et", "ou",
        "mais", "donc", "or", "ni", "car", "que", "qu", "qui", "quoi", "dont", "où", "ce", "cet",
        "cette", "ces", "se", "s", "sa", "son", "ses", "leur", "leurs", "il", "elle", "ils",
        "elles", "on", "nous", "vous", "je", "j", "tu", "me", "m", "te", "t", "y", "en", "dans",
        "par", "pour", "sur", "sous", "avec", "sans", "entre", "vers", "chez", "est", "sont",
        "été", "être", "a", "ont", "avoir", "fait", "ne", "n", "pas", "plus", "très", "aussi",
        "comme", "si", "tout", "tous", "toute", "toutes",
        // en
        "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can",
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
        "then", "than", "there", "here", "when", "where", "why", "how", "all", "each", "other",
        "some", "such", "no", "not", "only", "same", "so", "too", "very", "just", "and", "but",
        "if", "because", "while", "what", "which", "who", "this", "that", "these", "those",
        "it", "its",
    ]
    .into_iter()
    .collect()
});

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

pub struct Reranker {
    device: Device,
    config: RerankerConfig,
    model: Option<BertClassifier>,
    tokenizer: Option<Tokenizer>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &device_label(&self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(msg) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason: msg });
        }

        let Some(model_path) = config.model_path.clone() else {
            warn!("No reranker model configured, running in stub mode");
            return Ok(Self {
                device: Device::Cpu,
                config,
                model: None,
                tokenizer: None,
            });
        };

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_path.join(required).exists() {
                return Err(RerankerError::ModelNotFound {
                    path: model_path.join(required),
                });
            }
        }

        let device = select_device()?;
        debug!(device = device_label(&device), "Selected compute device for reranker");

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("failed to load BERT classifier: {e}"),
            }
        })?;

        let tokenizer = load_batch_tokenizer(&model_path, config.max_seq_len).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("failed to load tokenizer: {e}"),
            }
        })?;

        info!(
            model_path = %model_path.display(),
            device = device_label(&device),
            "Reranker model loaded"
        );

        Ok(Self {
            device,
            config,
            model: Some(model),
            tokenizer: Some(tokenizer),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    /// Scores one pair. Prefer [`CrossEncoder::score_pairs`] for many pairs.
    pub fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        let scores = self.score_pairs(&[(query, candidate)])?;
        scores
            .into_iter()
            .next()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "model returned no score".to_string(),
            })
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn score_chunk_with_model(
        &self,
        pairs: &[(&str, &str)],
        model: &BertClassifier,
        tokenizer: &Tokenizer,
    ) -> Result<Vec<f32>, RerankerError> {
        let encodings = tokenizer.encode_batch(pairs.to_vec(), true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let mut ids = Vec::with_capacity(encodings.len());
        let mut type_ids = Vec::with_capacity(encodings.len());
        let mut masks = Vec::with_capacity(encodings.len());
        for encoding in &encodings {
            ids.push(Tensor::new(encoding.get_ids(), &self.device)?);
            type_ids.push(Tensor::new(encoding.get_type_ids(), &self.device)?);
            // The tokenizer's mask, not ones_like: batches are padded.
            masks.push(Tensor::new(encoding.get_attention_mask(), &self.device)?);
        }

        let logits = model
            .forward(
                &Tensor::stack(&ids, 0)?,
                &Tensor::stack(&type_ids, 0)?,
                Some(&Tensor::stack(&masks, 0)?),
            )
            .map_err(|e| RerankerError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let logits = logits.flatten_all()?.to_vec1::<f32>()?;
        Ok(logits.into_iter().map(sigmoid).collect())
    }

    /// Lexical stand-in used in stub mode: recall and Jaccard over content words,
    /// centred on 0.5 and squashed with the same logistic the model path uses.
    fn compute_placeholder_score(query: &str, candidate: &str) -> f32 {
        let content_words = |text: &str| -> HashSet<String> {
            text.to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty() && !STOP_WORDS.contains(*w))
                .map(str::to_string)
                .collect()
        };

        let query_words = content_words(query);
        let candidate_words = content_words(candidate);

        if query_words.is_empty() {
            let len_ratio = (query.len().min(candidate.len()) as f32)
                / (query.len().max(candidate.len()).max(1) as f32);
            return len_ratio * 0.3;
        }

        let matches = query_words.intersection(&candidate_words).count();
        let recall = matches as f32 / query_words.len() as f32;
        let union = query_words.union(&candidate_words).count();
        let jaccard = if union > 0 {
            matches as f32 / union as f32
        } else {
            0.0
        };

        let base_score = 0.6 * recall + 0.4 * jaccard;
        sigmoid(8.0 * (base_score - 0.5)).clamp(0.0, 1.0)
    }
}

impl CrossEncoder for Reranker {
    fn score_pairs(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, RerankerError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            pairs = pairs.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring sentence pairs"
        );

        let (Some(model), Some(tokenizer)) = (&self.model, &self.tokenizer) else {
            return Ok(pairs
                .iter()
                .map(|(q, c)| Self::compute_placeholder_score(q, c))
                .collect());
        };

        let mut scores = Vec::with_capacity(pairs.len());
        for chunk in pairs.chunks(self.config.batch_size) {
            scores.extend(self.score_chunk_with_model(chunk, model, tokenizer)?);
        }
        Ok(scores)
    }
}
