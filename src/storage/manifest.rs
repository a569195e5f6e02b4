use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "MANIFEST.json";

/// Pointer to the current generation. Replacing this file is the commit point of a
/// publish: readers only ever follow the manifest, never list artifact files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub generation: u64,
    pub entry_count: u64,
    pub vector_count: u64,
    pub dimension: u32,
    pub metadata_file: String,
    pub vectors_file: String,
    pub metadata_blake3: String,
    pub vectors_blake3: String,
    pub created_at: DateTime<Utc>,
}

pub fn metadata_file_name(generation: u64) -> String {
    format!("metadata-{generation:06}.rkyv")
}

pub fn vectors_file_name(generation: u64) -> String {
    format!("vectors-{generation:06}.rkyv")
}
