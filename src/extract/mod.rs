//! Document text extraction and sentence segmentation.

mod error;
mod normalize;
mod pdf;
mod plain;
mod segment;


pub use error::{ExtractionError, ExtractionResult};
pub use normalize::{contains_math_expression, normalize_whitespace, token_count};
pub use pdf::PdfExtractor;
pub use plain::PlainTextExtractor;
pub use segment::{DEFAULT_LOCALE, UnicodeSegmenter};

use std::path::Path;

/// File extensions picked up from staging and accepted for analysis.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Turns a document file into its full text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> ExtractionResult<String>;
}

/// Splits text into ordered sentences for a given locale.
pub trait SentenceSegmenter: Send + Sync {
    fn locale(&self) -> &str;

    fn segment(&self, text: &str) -> Vec<String>;
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Picks the extractor for `path` by extension (case-insensitive).
pub fn extractor_for(path: &Path) -> ExtractionResult<&'static dyn TextExtractor> {
    static PDF: PdfExtractor = PdfExtractor;
    static PLAIN: PlainTextExtractor = PlainTextExtractor;

    match extension_of(path).as_deref() {
        Some("pdf") => Ok(&PDF),
        Some("txt") => Ok(&PLAIN),
        _ => Err(ExtractionError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Extracts `path` with the extractor matching its extension.
pub fn extract_file(path: &Path) -> ExtractionResult<String> {
    extractor_for(path)?.extract(path)
}

/// Default extractor for analysis and ingest: dispatches on the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> ExtractionResult<String> {
        extract_file(path)
    }
}
