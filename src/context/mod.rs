//! Process-wide resources.
//!
//! [`ServiceContext`] owns everything that lives as long as the process: the
//! embedder, the reranker, the text extractor, the segmenter and the corpus. It is
//! built once, shared by reference (or `Arc`), and passed into every pipeline call.

mod error;


pub use error::{ContextError, ContextResult};

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument};

use crate::analysis::{AnalysisOptions, AnalysisOutcome, Analyzer};
use crate::config::Config;
use crate::constants::validate_embedding_dim;
use crate::corpus::CorpusRepository;
use crate::embedding::{BiEncoder, CrossEncoder, Embedder, Reranker};
use crate::extract::{FileExtractor, TextExtractor, UnicodeSegmenter};
use crate::ingest::{IngestRunSummary, Maintainer};
use crate::storage::{CorpusStore, Manifest};

pub struct ServiceContext {
    config: Config,
    embedder: Arc<dyn Embedder>,
    reranker: Arc<dyn CrossEncoder>,
    segmenter: UnicodeSegmenter,
    extractor: Arc<dyn TextExtractor>,
    corpus: CorpusRepository,
    shut_down: AtomicBool,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("corpus", &self.corpus)
            .field("dimension", &self.embedder.dimension())
            .field("locale", &self.config.locale)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl ServiceContext {
    /// Loads both models and the corpus named by `config`.
    ///
    /// Fails with [`ContextError::MissingResource`] if the corpus store was never
    /// initialized, and with [`ContextError::Dimension`] if the embedder does not
    /// produce vectors of the corpus dimension.
    #[instrument(skip_all, fields(corpus = %config.corpus_dir.display()))]
    pub fn initialize(config: Config) -> ContextResult<Self> {
        config.validate()?;

        let embedder = BiEncoder::load(config.embedder_config())?;
        let reranker = Reranker::load(config.reranker_config())?;

        let corpus = CorpusRepository::open(CorpusStore::new(&config.corpus_dir))?;

        Self::from_parts(config, Arc::new(embedder), Arc::new(reranker), corpus)
    }

    /// Assembles a context from already loaded parts.
    pub fn from_parts(
        config: Config,
        embedder: Arc<dyn Embedder>,
        reranker: Arc<dyn CrossEncoder>,
        corpus: CorpusRepository,
    ) -> ContextResult<Self> {
        let snapshot = corpus.snapshot_read();
        validate_embedding_dim(snapshot.dimension(), embedder.dimension())?;

        info!(
            entries = snapshot.len(),
            dimension = snapshot.dimension(),
            generation = ?snapshot.generation(),
            locale = %config.locale,
            "Service context ready"
        );

        Ok(Self {
            segmenter: UnicodeSegmenter::new(config.locale.clone()),
            extractor: Arc::new(FileExtractor),
            config,
            embedder,
            reranker,
            corpus,
            shut_down: AtomicBool::new(false),
        })
    }

    /// Creates an empty corpus store. The dimension defaults to the configured
    /// embedder's.
    pub fn init_store(config: &Config, dimension: Option<usize>) -> ContextResult<Manifest> {
        let dimension = match dimension {
            Some(dimension) => dimension,
            None => BiEncoder::load(config.embedder_config())?.dimension(),
        };
        let manifest = CorpusStore::new(&config.corpus_dir).init(dimension)?;
        info!(
            dir = %config.corpus_dir.display(),
            dimension,
            "Corpus store initialized"
        );
        Ok(manifest)
    }

    /// Replaces the extension-based [`FileExtractor`] for analysis and ingest.
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn corpus(&self) -> &CorpusRepository {
        &self.corpus
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn reranker(&self) -> &dyn CrossEncoder {
        self.reranker.as_ref()
    }

    pub fn segmenter(&self) -> &UnicodeSegmenter {
        &self.segmenter
    }

    pub fn extractor(&self) -> &dyn TextExtractor {
        self.extractor.as_ref()
    }

    /// Analyzes `path` against the current corpus snapshot.
    pub fn analyze_file(
        &self,
        path: &Path,
        options: &AnalysisOptions,
    ) -> ContextResult<AnalysisOutcome> {
        self.ensure_running()?;
        let snapshot = self.corpus.snapshot_read();
        let analyzer = Analyzer::new(
            self.embedder.as_ref(),
            self.reranker.as_ref(),
            &self.segmenter,
            &snapshot,
        )
        .with_extractor(self.extractor.as_ref());
        Ok(analyzer.analyze_file(path, options)?)
    }

    /// Analyzes raw text against the current corpus snapshot.
    pub fn analyze_text(
        &self,
        text: &str,
        options: &AnalysisOptions,
    ) -> ContextResult<AnalysisOutcome> {
        self.ensure_running()?;
        let snapshot = self.corpus.snapshot_read();
        let analyzer = Analyzer::new(
            self.embedder.as_ref(),
            self.reranker.as_ref(),
            &self.segmenter,
            &snapshot,
        );
        Ok(analyzer.analyze_text(text, options)?)
    }

    /// Runs corpus maintenance over the configured staging directory.
    pub fn update_corpus(&self) -> ContextResult<IngestRunSummary> {
        self.ensure_running()?;
        let maintainer = Maintainer::new(
            &self.corpus,
            self.embedder.as_ref(),
            &self.segmenter,
            self.config.ingest_config(),
        )?
        .with_extractor(self.extractor.as_ref());
        Ok(maintainer.run()?)
    }

    /// Reloads the corpus from disk, picking up generations published by another
    /// process. Returns the generation now in use. A store re-created with another
    /// dimension is rejected and the loaded generation keeps serving.
    pub fn refresh(&self) -> ContextResult<u64> {
        self.ensure_running()?;
        let snapshot = self.corpus.refresh()?;
        let generation = snapshot.generation().unwrap_or_default();
        info!(generation, entries = snapshot.len(), "Corpus refreshed");
        Ok(generation)
    }

    pub fn manifest(&self) -> ContextResult<Manifest> {
        Ok(self.corpus.store().read_manifest()?)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Stops accepting work. Idempotent; returns `false` if already shut down.
    pub fn shutdown(&self) -> bool {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return false;
        }
        let snapshot = self.corpus.snapshot_read();
        info!(
            entries = snapshot.len(),
            generation = ?snapshot.generation(),
            "Service context shut down"
        );
        true
    }

    fn ensure_running(&self) -> ContextResult<()> {
        if self.is_shut_down() {
            return Err(ContextError::ShutDown);
        }
        Ok(())
    }
}
