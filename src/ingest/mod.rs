//! Corpus maintenance: staged documents in, one new corpus generation out.
//!
//! Each staged file is extracted, segmented and filtered on its own; a bad file is
//! moved to the error directory and the run goes on. The surviving sentences of all
//! files are then deduplicated against the corpus (existing rows win, then the
//! first staged occurrence), only the new ones are embedded, and the result is
//! published through [`CorpusRepository::append_batch`](crate::corpus::CorpusRepository::append_batch).
//! Files are archived once the publish succeeded.

mod archive;
mod config;
mod error;
mod maintainer;
mod types;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_ERROR_DIR_NAME, IngestConfig};
pub use error::{IngestError, IngestResult};
pub use maintainer::Maintainer;
pub use types::{FileFailure, FileRecord, FileState, IngestRunSummary};
