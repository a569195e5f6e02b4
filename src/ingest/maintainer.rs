use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::corpus::{CorpusEntry, CorpusRepository};
use crate::embedding::Embedder;
use crate::extract::{
    ExtractionError, FileExtractor, SentenceSegmenter, TextExtractor, contains_math_expression,
    is_supported, normalize_whitespace, token_count,
};

use super::archive::move_into;
use super::config::IngestConfig;
use super::error::{IngestError, IngestResult};
use super::types::{FileFailure, FileRecord, FileState, IngestRunSummary};

/// Sentences from one staged file that made it through filtering.
struct Processed {
    index: usize,
    entries: Vec<CorpusEntry>,
}

/// Grows the corpus from staged documents.
///
/// The repository's writer lock is the only exclusion needed: one `run` at a time
/// per repository, analyses keep reading the previous snapshot meanwhile.
pub struct Maintainer<'a> {
    repository: &'a CorpusRepository,
    embedder: &'a dyn Embedder,
    segmenter: &'a dyn SentenceSegmenter,
    extractor: &'a dyn TextExtractor,
    config: IngestConfig,
}

impl<'a> Maintainer<'a> {
    pub fn new(
        repository: &'a CorpusRepository,
        embedder: &'a dyn Embedder,
        segmenter: &'a dyn SentenceSegmenter,
        config: IngestConfig,
    ) -> IngestResult<Self> {
        config.validate()?;
        Ok(Self {
            repository,
            embedder,
            segmenter,
            extractor: &FileExtractor,
            config,
        })
    }

    /// Replaces the extension-based [`FileExtractor`] used on staged files.
    pub fn with_extractor(mut self, extractor: &'a dyn TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Processes everything in staging and publishes the new sentences as one
    /// corpus generation.
    ///
    /// Unreadable documents are moved to the error directory and reported; they never
    /// abort the run. A failing embedder or store does: nothing is published and the
    /// processed files stay in staging for the next run.
    #[instrument(skip(self), fields(staging = %self.config.staging_dir.display()))]
    pub fn run(&self) -> IngestResult<IngestRunSummary> {
        let staged = self.staged_files()?;
        let mut summary = IngestRunSummary {
            staged: staged.len(),
            total_entries: self.repository.snapshot_read().len(),
            ..Default::default()
        };

        if staged.is_empty() {
            info!("No staged documents to process");
            return Ok(summary);
        }

        let mut processed = Vec::new();
        for path in staged {
            let title = title_of(&path);
            let index = summary.files.len();
            summary.files.push(FileRecord {
                path: path.clone(),
                title: title.clone(),
                state: FileState::Staged,
                sentences: 0,
            });

            match self.process_file(&path, &title, &mut summary.files[index].state) {
                Ok(Some(entries)) => {
                    summary.files[index].sentences = entries.len();
                    processed.push(Processed { index, entries });
                }
                Ok(None) => {
                    summary.too_small += 1;
                    self.archive(&path, &mut summary.files[index].state);
                }
                Err(err) => {
                    let stage = summary.files[index].state;
                    warn!(path = %path.display(), %stage, error = %err, "Staged document failed");
                    let moved_to = match move_into(&path, &self.config.error_dir) {
                        Ok(dest) => Some(dest),
                        Err(move_err) => {
                            warn!(path = %path.display(), error = %move_err, "Could not move failed document");
                            None
                        }
                    };
                    summary.files[index].state = FileState::Failed;
                    summary.failures.push(FileFailure {
                        path,
                        stage,
                        reason: err.to_string(),
                        moved_to,
                    });
                }
            }
        }

        let mut candidates = Vec::new();
        for file in &mut processed {
            candidates.append(&mut file.entries);
            summary.files[file.index].state = FileState::Merged;
        }

        let outcome = self.repository.append_batch(
            candidates,
            self.embedder,
            self.config.embed_batch_size,
        )?;
        summary.record_append(&outcome);

        for file in &processed {
            let record = &mut summary.files[file.index];
            record.state = FileState::Indexed;
            let path = record.path.clone();
            if self.archive(&path, &mut record.state) {
                summary.ingested += 1;
            }
        }

        info!(
            staged = summary.staged,
            ingested = summary.ingested,
            too_small = summary.too_small,
            failed = summary.failed(),
            appended = summary.appended,
            duplicates = summary.duplicates,
            total_entries = summary.total_entries,
            "Corpus maintenance run complete"
        );
        Ok(summary)
    }

    /// Turns raw text into corpus entries titled `title`.
    pub fn sentences_from_text(&self, text: &str, title: &str) -> Vec<CorpusEntry> {
        self.entries_from(self.segment(text), title)
    }

    fn segment(&self, text: &str) -> Vec<String> {
        self.segmenter.segment(&normalize_whitespace(text))
    }

    fn entries_from(&self, sentences: Vec<String>, title: &str) -> Vec<CorpusEntry> {
        sentences
            .into_iter()
            .filter(|s| self.keeps(s))
            .map(|s| CorpusEntry::new(s, title))
            .collect()
    }

    fn keeps(&self, sentence: &str) -> bool {
        token_count(sentence) > self.config.min_sentence_tokens
            && !(self.config.skip_math_sentences && contains_math_expression(sentence))
    }

    /// `Ok(None)` for a file under the size threshold.
    fn process_file(
        &self,
        path: &Path,
        title: &str,
        state: &mut FileState,
    ) -> Result<Option<Vec<CorpusEntry>>, ExtractionError> {
        let size = fs::metadata(path)
            .map_err(|source| ExtractionError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if size < self.config.min_file_bytes {
            debug!(path = %path.display(), size, "Staged document below size threshold");
            *state = FileState::TooSmall;
            return Ok(None);
        }

        let text = self.extractor.extract(path)?;
        *state = FileState::Extracted;

        let sentences = self.segment(&text);
        *state = FileState::Segmented;

        let total = sentences.len();
        let entries = self.entries_from(sentences, title);
        *state = FileState::Filtered;

        debug!(
            path = %path.display(),
            sentences = total,
            kept = entries.len(),
            "Staged document processed"
        );
        Ok(Some(entries))
    }

    /// Moves to the archive; a failed move leaves the file in staging and is logged.
    fn archive(&self, path: &Path, state: &mut FileState) -> bool {
        match move_into(path, &self.config.archive_dir) {
            Ok(dest) => {
                debug!(from = %path.display(), to = %dest.display(), "Document archived");
                if *state != FileState::TooSmall {
                    *state = FileState::Archived;
                }
                true
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not archive document");
                false
            }
        }
    }

    /// Supported regular files directly under staging, sorted by name.
    fn staged_files(&self) -> IngestResult<Vec<PathBuf>> {
        let dir = &self.config.staging_dir;
        fs::create_dir_all(dir).map_err(|e| IngestError::io(dir, e))?;

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| IngestError::io(dir, e))? {
            let entry = entry.map_err(|e| IngestError::io(dir, e))?;
            let path = entry.path();
            let is_file = entry.file_type().map_err(|e| IngestError::io(&path, e))?.is_file();
            if is_file && is_supported(&path) {
                files.push(path);
            } else if is_file {
                debug!(path = %path.display(), "Skipping unsupported staged file");
            }
        }
        files.sort();
        Ok(files)
    }
}

fn title_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
