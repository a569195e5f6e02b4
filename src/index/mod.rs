//! ANN index capability.
//!
//! [`VectorIndex`] is the seam the analysis and ingest pipelines program against.
//! [`FlatIndex`] answers it exactly by brute force, which keeps retrieval
//! deterministic and lets the persisted vectors double as the index itself.

mod error;
mod flat;


pub use error::{IndexError, IndexResult};
pub use flat::{FlatIndex, inner_product_f16_f32};

/// One retrieved row: `corpus_id` addresses the metadata table, `score` is the inner
/// product with the query (higher is closer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalHit {
    pub corpus_id: usize,
    pub score: f32,
}

/// Append-only vector index addressed by row id.
pub trait VectorIndex: Send + Sync {
    fn dimension(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends rows in order; ids continue from the current length.
    fn add(&mut self, vectors: &[Vec<f32>]) -> IndexResult<()>;

    /// Returns up to `k` hits per query, best first. Fewer than `k` when the index is
    /// smaller; ties go to the lower row id.
    fn search(&self, queries: &[Vec<f32>], k: usize) -> IndexResult<Vec<Vec<RetrievalHit>>>;
}
