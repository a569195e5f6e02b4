//! On-disk corpus store.
//!
//! A store directory holds one *generation* at a time: a metadata artifact (the
//! [`CorpusEntry`] rows) and a vector artifact (one f16 row per entry, same order),
//! both rkyv-encoded, plus `MANIFEST.json` naming them with counts and blake3
//! checksums.
//!
//! # Publication
//!
//! [`CorpusStore::publish`] writes the next generation's two artifacts under fresh
//! names, then atomically replaces the manifest. Until that rename a reader still
//! resolves the previous generation; after it, the new one. There is no point at
//! which a reader can pair metadata from one generation with vectors from another.
//! The previous generation's files are removed only after the new manifest is
//! durable.
//!
//! # Loading
//!
//! [`CorpusStore::load`] maps both artifacts, checks them against the manifest
//! checksums and counts, and materializes them. Any disagreement between the row
//! count and the vector count is [`StoreError::Inconsistent`]. A reader in another
//! process can read manifest `N` just before `N + 1` is published and `N`'s files
//! are removed; when an artifact is gone and the manifest has moved on, `load`
//! starts over from the newer manifest.

pub mod error;
mod manifest;
pub mod mmap;
mod model;
mod writer;


pub use error::{StoreError, StoreResult};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use model::{ArchivedCorpusEntry, CorpusEntry, MetadataTable, VectorTable};

use std::fs;
use std::path::{Path, PathBuf};

use half::f16;
use rkyv::rancor::Error as RkyvError;
use tracing::{debug, info, instrument, warn};

use crate::index::{FlatIndex, VectorIndex};
use manifest::{metadata_file_name, vectors_file_name};
use mmap::{MmapError, MmapFileHandle};
use model::{ArchivedMetadataTable, ArchivedVectorTable};
use writer::write_atomic;

/// Attempts `load` makes before giving up on a store that keeps changing under it.
const LOAD_ATTEMPTS: usize = 8;

/// Fully materialized contents of one generation.
#[derive(Debug, Clone)]
pub struct LoadedStore {
    pub manifest: Manifest,
    pub entries: Vec<CorpusEntry>,
    pub index: FlatIndex,
}

/// Handle on a store directory. Holds no open files between calls.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    dir: PathBuf,
}

impl CorpusStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn exists(&self) -> bool {
        self.manifest_path().is_file()
    }

    pub fn read_manifest(&self) -> StoreResult<Manifest> {
        let path = self.manifest_path();
        if !path.is_file() {
            return Err(StoreError::Missing { path });
        }
        let raw = fs::read(&path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Creates an empty generation-0 store. Fails if one already exists.
    pub fn init(&self, dimension: usize) -> StoreResult<Manifest> {
        if self.exists() {
            return Err(StoreError::AlreadyInitialized {
                path: self.dir.clone(),
            });
        }
        let index = FlatIndex::new(dimension)?;
        self.publish(&[], &index)
    }

    /// Writes `entries` and `index` as the next generation and makes it current.
    ///
    /// Refuses to write anything when the two disagree in length.
    #[instrument(skip_all, fields(dir = %self.dir.display(), entries = entries.len()))]
    pub fn publish(&self, entries: &[CorpusEntry], index: &FlatIndex) -> StoreResult<Manifest> {
        if entries.len() != index.len() {
            return Err(StoreError::Inconsistent {
                entries: entries.len(),
                vectors: index.len(),
            });
        }

        fs::create_dir_all(&self.dir)?;

        let previous = match self.read_manifest() {
            Ok(m) => Some(m),
            Err(StoreError::Missing { .. }) => None,
            Err(e) => return Err(e),
        };
        let generation = previous.as_ref().map_or(0, |m| m.generation + 1);

        let metadata = MetadataTable {
            rows: entries.to_vec(),
        };
        let metadata_bytes = rkyv::to_bytes::<RkyvError>(&metadata)
            .map_err(|e| StoreError::Serialization(format!("{:?}", e)))?;

        let dimension = u32::try_from(index.dimension()).map_err(|_| StoreError::Corrupted {
            reason: format!("dimension {} does not fit in u32", index.dimension()),
        })?;
        let vectors = VectorTable {
            dimension,
            count: index.len() as u64,
            data: bytemuck::cast_slice::<f16, u8>(index.as_f16()).to_vec(),
        };
        let vectors_bytes = rkyv::to_bytes::<RkyvError>(&vectors)
            .map_err(|e| StoreError::Serialization(format!("{:?}", e)))?;

        let manifest = Manifest {
            generation,
            entry_count: entries.len() as u64,
            vector_count: index.len() as u64,
            dimension,
            metadata_file: metadata_file_name(generation),
            vectors_file: vectors_file_name(generation),
            metadata_blake3: blake3::hash(&metadata_bytes).to_hex().to_string(),
            vectors_blake3: blake3::hash(&vectors_bytes).to_hex().to_string(),
            created_at: chrono::Utc::now(),
        };

        write_atomic(&self.dir, &manifest.metadata_file, &metadata_bytes)?;
        write_atomic(&self.dir, &manifest.vectors_file, &vectors_bytes)?;
        write_atomic(
            &self.dir,
            MANIFEST_FILE,
            &serde_json::to_vec_pretty(&manifest)?,
        )?;

        info!(
            generation,
            entries = manifest.entry_count,
            dimension,
            "Corpus store generation published"
        );

        if let Some(prev) = previous {
            self.remove_generation(&prev);
        }

        Ok(manifest)
    }

    fn remove_generation(&self, manifest: &Manifest) {
        for name in [&manifest.metadata_file, &manifest.vectors_file] {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "Removed superseded artifact"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove superseded artifact"),
            }
        }
    }

    /// Loads and validates the current generation.
    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn load(&self) -> StoreResult<LoadedStore> {
        let manifest = self.read_manifest()?;
        self.load_from(manifest)
    }

    /// Loads the generation `manifest` names, following newer manifests when its
    /// artifacts were removed by a concurrent publish.
    fn load_from(&self, mut manifest: Manifest) -> StoreResult<LoadedStore> {
        let mut attempts = 1;
        loop {
            match self.load_generation(&manifest) {
                Err(StoreError::Missing { path }) if attempts < LOAD_ATTEMPTS => {
                    let current = self.read_manifest()?;
                    if current.generation == manifest.generation {
                        return Err(StoreError::Missing { path });
                    }
                    debug!(
                        superseded = manifest.generation,
                        current = current.generation,
                        "Generation replaced while loading, retrying"
                    );
                    manifest = current;
                    attempts += 1;
                }
                result => return result,
            }
        }
    }

    fn load_generation(&self, manifest: &Manifest) -> StoreResult<LoadedStore> {
        let metadata_handle = self.open_artifact(&manifest.metadata_file)?;
        let vectors_handle = self.open_artifact(&manifest.vectors_file)?;

        verify_checksum(&metadata_handle, &manifest.metadata_blake3)?;
        verify_checksum(&vectors_handle, &manifest.vectors_blake3)?;

        let archived_meta = metadata_handle.access_archived::<ArchivedMetadataTable>()?;
        let metadata = rkyv::deserialize::<MetadataTable, RkyvError>(archived_meta)
            .map_err(|e| StoreError::Serialization(format!("{:?}", e)))?;

        let archived_vectors = vectors_handle.access_archived::<ArchivedVectorTable>()?;
        let dimension = archived_vectors.dimension.to_native();
        let count = archived_vectors.count.to_native();
        let data = archived_vectors.data.as_slice();

        if dimension != manifest.dimension {
            return Err(StoreError::Corrupted {
                reason: format!(
                    "vector artifact dimension {dimension} differs from manifest {}",
                    manifest.dimension
                ),
            });
        }

        let expected_bytes = (count as usize)
            .checked_mul(dimension as usize)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f16>()));
        if expected_bytes != Some(data.len()) {
            return Err(StoreError::Corrupted {
                reason: format!(
                    "vector artifact holds {} bytes for {count} x {dimension} f16 values",
                    data.len()
                ),
            });
        }

        let index = FlatIndex::from_f16(dimension as usize, decode_f16(data))?;

        if metadata.rows.len() != index.len() {
            return Err(StoreError::Inconsistent {
                entries: metadata.rows.len(),
                vectors: index.len(),
            });
        }
        if manifest.entry_count != manifest.vector_count
            || manifest.entry_count != metadata.rows.len() as u64
        {
            return Err(StoreError::Corrupted {
                reason: format!(
                    "manifest counts ({} entries, {} vectors) differ from artifacts ({})",
                    manifest.entry_count,
                    manifest.vector_count,
                    metadata.rows.len()
                ),
            });
        }

        info!(
            generation = manifest.generation,
            entries = metadata.rows.len(),
            dimension,
            "Corpus store loaded"
        );

        Ok(LoadedStore {
            manifest: manifest.clone(),
            entries: metadata.rows,
            index,
        })
    }

    fn open_artifact(&self, name: &str) -> StoreResult<MmapFileHandle> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(StoreError::Missing { path });
        }
        match MmapFileHandle::open(&path) {
            Ok(handle) => Ok(handle),
            Err(MmapError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::Missing { path })
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads native-endian f16 values, copying bytewise when the archive leaves the
/// slice unaligned for a direct cast.
fn decode_f16(data: &[u8]) -> Vec<f16> {
    match bytemuck::try_cast_slice::<u8, f16>(data) {
        Ok(values) => values.to_vec(),
        Err(_) => data
            .chunks_exact(2)
            .map(|pair| f16::from_ne_bytes([pair[0], pair[1]]))
            .collect(),
    }
}

fn verify_checksum(handle: &MmapFileHandle, expected_hex: &str) -> StoreResult<()> {
    let actual = blake3::hash(handle.as_slice()).to_hex();
    if actual.as_str() != expected_hex {
        return Err(StoreError::Corrupted {
            reason: format!("checksum mismatch for {}", handle.path().display()),
        });
    }
    Ok(())
}
