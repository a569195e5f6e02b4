//! Plagiat library crate (used by the CLI and integration tests).
//!
//! Sentence-level plagiarism detection against a reference corpus: each sentence of
//! a document is embedded, its nearest corpus sentences are retrieved and reranked
//! with a cross-encoder, and the best match is scored together with lexical overlap
//! signals into a verdict.
//!
//! # Public API Surface
//!
//! ## Pipelines
//! - [`Analyzer`], [`AnalysisOptions`], [`AnalysisOutcome`], [`AnalysisReport`] - Document analysis
//! - [`Maintainer`], [`IngestConfig`], [`IngestRunSummary`] - Corpus maintenance
//! - [`ServiceContext`] - Long-lived resources wired together
//!
//! ## Corpus & Storage
//! - [`CorpusRepository`], [`CorpusSnapshot`], [`CorpusEntry`] - Paired metadata + vectors
//! - [`CorpusStore`], [`Manifest`] - Generation-versioned on-disk store
//! - [`FlatIndex`], [`VectorIndex`] - Exact inner-product search
//!
//! ## Capabilities
//! - [`Embedder`], [`BiEncoder`] - Sentence embeddings
//! - [`CrossEncoder`], [`Reranker`] - Pair scoring
//! - [`TextExtractor`], [`SentenceSegmenter`] - Document text and sentences
//!
//! ## Scoring Building Blocks
//! - [`is_reference`], [`LexicalMetrics`], [`highlight`], [`CompositeScorer`], [`Verdict`]
//!
//! ## Test/Mock Support
//! Both models run as deterministic stubs when no model directory is configured.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod context;
pub mod corpus;
pub mod embedding;
pub mod extract;
pub mod filter;
pub mod highlight;
pub mod index;
pub mod ingest;
pub mod lexical;
pub mod scoring;
pub mod storage;

pub use analysis::{
    AnalysisError, AnalysisOptions, AnalysisOutcome, AnalysisReport, Analyzer, Finding,
    FindingDetails, ReportSummary,
};
pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
pub use context::{ContextError, ServiceContext};
pub use corpus::{AppendOutcome, CorpusEntry, CorpusError, CorpusRepository, CorpusSnapshot};
pub use embedding::{
    BiEncoder, BiEncoderConfig, CrossEncoder, Embedder, EmbeddingError, Reranker,
    RerankerConfig, RerankerError,
};
pub use extract::{
    ExtractionError, FileExtractor, PdfExtractor, PlainTextExtractor, SentenceSegmenter,
    TextExtractor, UnicodeSegmenter, extract_file,
};
pub use filter::{SentenceCandidate, is_reference, select_candidates};
pub use highlight::{MarkupStyle, highlight};
pub use index::{FlatIndex, IndexError, RetrievalHit, VectorIndex};
pub use ingest::{
    FileFailure, FileState, IngestConfig, IngestError, IngestRunSummary, Maintainer,
};
pub use lexical::{LexicalMetrics, levenshtein_ratio, ngram_jaccard, token_jaccard};
pub use scoring::{CompositeScore, CompositeScorer, ScoringError, ScoringWeights, Verdict};
pub use storage::{CorpusStore, Manifest, StoreError};
