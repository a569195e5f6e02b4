//! Embedding + model utilities.
//!
//! - [`encoder`] maps sentences to vectors for retrieval ([`Embedder`]).
//! - [`reranker`] scores sentence pairs jointly ([`CrossEncoder`]).
//!
//! Both load BERT-family checkpoints through candle and fall back to deterministic
//! stubs when no model directory is configured.

/// BERT trunk wrappers (classifier head and mean-pooled encoder).
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Bi-encoder (retrieval embeddings).
pub mod encoder;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Cross-encoder reranker.
pub mod reranker;
/// Tokenizer loading and vector helpers.
pub mod utils;

pub use encoder::{BiEncoder, BiEncoderConfig};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{FailingCrossEncoder, FailingEmbedder, MockCrossEncoder};
pub use reranker::{Reranker, RerankerConfig, RerankerError};

/// Maps sentences to L2-normalized vectors of a fixed dimension.
///
/// Output order matches input order and identical input yields identical output.
pub trait Embedder: Send + Sync {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn dimension(&self) -> usize;
}

/// Scores (query, candidate) pairs; higher means more related. Order preserving.
pub trait CrossEncoder: Send + Sync {
    fn score_pairs(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, RerankerError>;
}
