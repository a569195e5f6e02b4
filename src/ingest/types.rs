use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::corpus::AppendOutcome;

/// Where a staged file is in its maintenance run.
///
/// `Staged → TooSmall`, `Staged → Extracted → Segmented → Filtered → Failed`, or
/// `Staged → … → Filtered → Merged → Indexed → Archived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Staged,
    /// Below the size threshold; archived without processing.
    TooSmall,
    Extracted,
    Segmented,
    Filtered,
    /// Sentences handed to the corpus append.
    Merged,
    /// The corpus generation holding its sentences was published.
    Indexed,
    Archived,
    /// Moved to the error directory.
    Failed,
}

impl FileState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FileState::TooSmall | FileState::Archived | FileState::Failed
        )
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileState::Staged => "staged",
            FileState::TooSmall => "too_small",
            FileState::Extracted => "extracted",
            FileState::Segmented => "segmented",
            FileState::Filtered => "filtered",
            FileState::Merged => "merged",
            FileState::Indexed => "indexed",
            FileState::Archived => "archived",
            FileState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A staged file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Original staging path.
    pub path: PathBuf,
    /// Last state reached before the failure.
    pub stage: FileState,
    pub reason: String,
    /// Where the file was moved, `None` if the move itself failed.
    pub moved_to: Option<PathBuf>,
}

/// Per-file record of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub title: String,
    pub state: FileState,
    /// Sentences kept after filtering (before corpus dedup).
    pub sentences: usize,
}

/// What one maintenance run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestRunSummary {
    /// Supported files found in staging.
    pub staged: usize,
    pub too_small: usize,
    /// Files whose sentences were merged and that were archived.
    pub ingested: usize,
    pub failures: Vec<FileFailure>,
    pub files: Vec<FileRecord>,
    /// Sentences submitted to the corpus.
    pub sentences_submitted: usize,
    pub duplicates: usize,
    pub appended: usize,
    pub total_entries: usize,
    /// Published generation, `None` if nothing new was appended.
    pub generation: Option<u64>,
}

impl IngestRunSummary {
    pub(crate) fn record_append(&mut self, outcome: &AppendOutcome) {
        self.sentences_submitted = outcome.submitted;
        self.duplicates = outcome.duplicates;
        self.appended = outcome.appended;
        self.total_entries = outcome.total_entries;
        self.generation = outcome.generation;
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
