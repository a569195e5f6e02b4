use std::collections::HashSet;

use crate::index::{FlatIndex, VectorIndex};
use crate::storage::{CorpusEntry, StoreError, StoreResult};

/// Content key used for exact-text dedup.
pub(crate) fn content_key(content_block: &str) -> blake3::Hash {
    blake3::hash(content_block.as_bytes())
}

/// Immutable, index-aligned pair of metadata rows and vectors.
///
/// Row `i` of [`entries`](Self::entries) is vector `i` of [`index`](Self::index);
/// construction rejects any pair that disagrees in length.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    entries: Vec<CorpusEntry>,
    index: FlatIndex,
    keys: HashSet<blake3::Hash>,
    generation: Option<u64>,
}

impl CorpusSnapshot {
    pub fn new(entries: Vec<CorpusEntry>, index: FlatIndex) -> StoreResult<Self> {
        if entries.len() != index.len() {
            return Err(StoreError::Inconsistent {
                entries: entries.len(),
                vectors: index.len(),
            });
        }
        let keys = entries
            .iter()
            .map(|e| content_key(&e.content_block))
            .collect();
        Ok(Self {
            entries,
            index,
            keys,
            generation: None,
        })
    }

    pub fn empty(dimension: usize) -> StoreResult<Self> {
        Self::new(Vec::new(), FlatIndex::new(dimension)?)
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Store generation this snapshot was loaded from or published as.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    pub fn get(&self, corpus_id: usize) -> Option<&CorpusEntry> {
        self.entries.get(corpus_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn contains_content(&self, content_block: &str) -> bool {
        self.keys.contains(&content_key(content_block))
    }

    /// Splits `candidates` into those not yet present (first occurrence kept) and a
    /// count of dropped duplicates. Existing rows always win.
    pub fn dedup(&self, candidates: Vec<CorpusEntry>) -> (Vec<CorpusEntry>, usize) {
        let mut seen = self.keys.clone();
        let submitted = candidates.len();
        let fresh: Vec<CorpusEntry> = candidates
            .into_iter()
            .filter(|c| seen.insert(content_key(&c.content_block)))
            .collect();
        let dropped = submitted - fresh.len();
        (fresh, dropped)
    }
}
