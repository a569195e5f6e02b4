//! The corpus as one logical resource.
//!
//! [`CorpusRepository`] hides the two physical artifacts (metadata rows and vectors)
//! behind two operations:
//!
//! - [`snapshot_read`](CorpusRepository::snapshot_read) hands out an `Arc` to the
//!   current [`CorpusSnapshot`]. Readers keep using it for as long as they like; a
//!   later append never mutates it.
//! - [`append_batch`](CorpusRepository::append_batch) is the only mutation. It runs
//!   under a writer lock, builds the next snapshot off to the side, publishes it to
//!   disk and only then swaps it in.

mod error;
mod snapshot;


pub use crate::storage::CorpusEntry;
pub use error::{CorpusError, CorpusResult};
pub use snapshot::CorpusSnapshot;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::constants::validate_embedding_dim;
use crate::embedding::Embedder;
use crate::index::VectorIndex;
use crate::storage::{CorpusStore, StoreResult};

/// Result of one [`CorpusRepository::append_batch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendOutcome {
    pub submitted: usize,
    pub duplicates: usize,
    pub appended: usize,
    pub total_entries: usize,
    /// Generation published, `None` when nothing new was appended.
    pub generation: Option<u64>,
}

/// Process-wide owner of the corpus.
pub struct CorpusRepository {
    store: CorpusStore,
    current: RwLock<Arc<CorpusSnapshot>>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for CorpusRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot_read();
        f.debug_struct("CorpusRepository")
            .field("dir", &self.store.dir())
            .field("entries", &snapshot.len())
            .field("generation", &snapshot.generation())
            .finish()
    }
}

impl CorpusRepository {
    /// Loads the current generation. A missing store is an error.
    pub fn open(store: CorpusStore) -> StoreResult<Self> {
        let snapshot = Self::load_snapshot(&store)?;
        Ok(Self {
            store,
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
        })
    }

    /// Opens the store, initializing an empty one of `dimension` first if absent.
    pub fn open_or_init(store: CorpusStore, dimension: usize) -> StoreResult<Self> {
        if !store.exists() {
            store.init(dimension)?;
        }
        Self::open(store)
    }

    fn load_snapshot(store: &CorpusStore) -> StoreResult<CorpusSnapshot> {
        let loaded = store.load()?;
        Ok(CorpusSnapshot::new(loaded.entries, loaded.index)?
            .with_generation(loaded.manifest.generation))
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// Current paired snapshot.
    pub fn snapshot_read(&self) -> Arc<CorpusSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Re-reads the store from disk, picking up generations published elsewhere.
    ///
    /// A generation whose dimension differs from the current one is rejected and
    /// the current snapshot stays in place.
    pub fn refresh(&self) -> StoreResult<Arc<CorpusSnapshot>> {
        let _guard = self.writer.lock();
        let snapshot = Arc::new(Self::load_snapshot(&self.store)?);
        validate_embedding_dim(self.snapshot_read().dimension(), snapshot.dimension())?;
        *self.current.write() = Arc::clone(&snapshot);
        debug!(generation = ?snapshot.generation(), "Corpus snapshot refreshed");
        Ok(snapshot)
    }

    /// Dedups `candidates` against the corpus, embeds only the new ones (in chunks of
    /// `chunk_size`), appends them in order and publishes the result.
    ///
    /// On any error nothing is published and the current snapshot is unchanged.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn append_batch(
        &self,
        candidates: Vec<CorpusEntry>,
        embedder: &dyn Embedder,
        chunk_size: usize,
    ) -> CorpusResult<AppendOutcome> {
        let _guard = self.writer.lock();
        let base = self.snapshot_read();

        let submitted = candidates.len();
        let (fresh, duplicates) = base.dedup(candidates);

        if fresh.is_empty() {
            info!(submitted, duplicates, "No new corpus entries to append");
            return Ok(AppendOutcome {
                submitted,
                duplicates,
                appended: 0,
                total_entries: base.len(),
                generation: None,
            });
        }

        let texts: Vec<&str> = fresh.iter().map(|e| e.content_block.as_str()).collect();
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(chunk_size.max(1)) {
            vectors.extend(embedder.embed_batch(chunk)?);
        }
        if vectors.len() != fresh.len() {
            return Err(CorpusError::EmbeddingCount {
                expected: fresh.len(),
                actual: vectors.len(),
            });
        }

        let mut index = base.index().clone();
        index.add(&vectors)?;

        let appended = fresh.len();
        let mut entries = Vec::with_capacity(base.len() + appended);
        entries.extend_from_slice(base.entries());
        entries.extend(fresh);

        let next = CorpusSnapshot::new(entries, index)?;
        let manifest = self.store.publish(next.entries(), next.index())?;
        let next = next.with_generation(manifest.generation);
        let total_entries = next.len();

        *self.current.write() = Arc::new(next);

        info!(
            submitted,
            duplicates,
            appended,
            total_entries,
            generation = manifest.generation,
            "Corpus entries appended"
        );

        Ok(AppendOutcome {
            submitted,
            duplicates,
            appended,
            total_entries,
            generation: Some(manifest.generation),
        })
    }
}
