use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use pdf_extract::extract_text_from_mem;
use tracing::debug;

use super::TextExtractor;
use super::error::{ExtractionError, ExtractionResult};

/// PDF text via `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Extracts text from in-memory PDF bytes. `path` is only used in errors.
    pub fn extract_bytes(bytes: &[u8], path: &Path) -> ExtractionResult<String> {
        if !bytes.starts_with(b"%PDF") {
            return Err(ExtractionError::Pdf {
                path: path.to_path_buf(),
                reason: "missing %PDF header".to_string(),
            });
        }

        // pdf-extract panics on some malformed inputs instead of returning an error.
        let result = catch_unwind(AssertUnwindSafe(|| extract_text_from_mem(bytes)));

        match result {
            Ok(Ok(text)) => {
                debug!(path = %path.display(), chars = text.len(), "PDF text extracted");
                Ok(text)
            }
            Ok(Err(e)) => Err(ExtractionError::Pdf {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ExtractionError::Pdf {
                path: path.to_path_buf(),
                reason: "extractor panicked on malformed input".to_string(),
            }),
        }
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> ExtractionResult<String> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::extract_bytes(&bytes, path)
    }
}
