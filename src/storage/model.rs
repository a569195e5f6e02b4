//! Persisted record types.

use rkyv::{Archive, Deserialize, Serialize};

/// One metadata row: a corpus sentence and the title of the document it came from.
///
/// Its row id is its position in the table, which is also the row of its vector.
#[derive(
    Archive, Deserialize, Serialize, serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq, Clone,
)]
pub struct CorpusEntry {
    pub content_block: String,
    pub title: String,
}

impl CorpusEntry {
    pub fn new(content_block: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content_block: content_block.into(),
            title: title.into(),
        }
    }
}

/// Metadata artifact payload.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct MetadataTable {
    pub rows: Vec<CorpusEntry>,
}

/// Vector artifact payload: `count` rows of `dimension` f16 values, row-major,
/// stored as raw bytes.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct VectorTable {
    pub dimension: u32,
    pub count: u64,
    pub data: Vec<u8>,
}
