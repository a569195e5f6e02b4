use std::path::Path;

use super::TextExtractor;
use super::error::{ExtractionError, ExtractionResult};

/// UTF-8 text files, read as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> ExtractionResult<String> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| ExtractionError::Encoding {
            path: path.to_path_buf(),
        })
    }
}
