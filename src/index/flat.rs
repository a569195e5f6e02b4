use std::cmp::Ordering;

use half::f16;
use tracing::debug;

use super::error::{IndexError, IndexResult};
use super::{RetrievalHit, VectorIndex};
use crate::constants::{DimConfig, validate_embedding_dim};

/// Exact inner-product index over row-major f16 vectors.
///
/// Rows are stored in insertion order, so row `i` is the `i`-th vector ever added.
/// Vectors are expected to be unit length, which makes the inner product a cosine.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f16>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> IndexResult<Self> {
        DimConfig::new(dimension).validate()?;
        Ok(Self {
            dimension,
            data: Vec::new(),
        })
    }

    /// Rebuilds an index from persisted row-major f16 values.
    pub fn from_f16(dimension: usize, data: Vec<f16>) -> IndexResult<Self> {
        DimConfig::new(dimension).validate()?;
        if data.len() % dimension != 0 {
            return Err(IndexError::RaggedData {
                len: data.len(),
                dimension,
            });
        }
        Ok(Self { dimension, data })
    }

    pub fn as_f16(&self) -> &[f16] {
        &self.data
    }

    pub fn row(&self, id: usize) -> Option<&[f16]> {
        let start = id.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    fn score_rows(&self, query: &[f32]) -> Vec<RetrievalHit> {
        self.data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(corpus_id, row)| {
                let score = inner_product_f16_f32(row, query);
                RetrievalHit {
                    corpus_id,
                    score: if score.is_nan() { f32::NEG_INFINITY } else { score },
                }
            })
            .collect()
    }
}

/// Descending score, then ascending row id.
fn rank_order(a: &RetrievalHit, b: &RetrievalHit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.corpus_id.cmp(&b.corpus_id))
}

#[inline]
pub fn inner_product_f16_f32(a: &[f16], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, &y)| x.to_f32() * y).sum()
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    fn add(&mut self, vectors: &[Vec<f32>]) -> IndexResult<()> {
        for v in vectors {
            validate_embedding_dim(self.dimension, v.len())?;
        }
        self.data.reserve(vectors.len() * self.dimension);
        for v in vectors {
            self.data.extend(v.iter().map(|&x| f16::from_f32(x)));
        }
        debug!(added = vectors.len(), total = self.len(), "Vectors appended to index");
        Ok(())
    }

    fn search(&self, queries: &[Vec<f32>], k: usize) -> IndexResult<Vec<Vec<RetrievalHit>>> {
        for q in queries {
            validate_embedding_dim(self.dimension, q.len())?;
        }

        Ok(queries
            .iter()
            .map(|query| {
                let mut hits = self.score_rows(query);
                let k = k.min(hits.len());
                if k == 0 {
                    return Vec::new();
                }
                if k < hits.len() {
                    hits.select_nth_unstable_by(k - 1, rank_order);
                    hits.truncate(k);
                }
                hits.sort_by(rank_order);
                hits
            })
            .collect())
    }
}
