//! Retrieval-rerank analysis of a document.
//!
//! For every candidate sentence: embed, retrieve the `top_k` nearest corpus rows,
//! rerank them with the cross-encoder, keep the argmax (first one on ties), compute
//! the lexical signals against it, and score. Findings at or above the minimum
//! verdict score make up the [`AnalysisReport`].
//!
//! Capability failures abort the whole document; there are no partial reports.

mod error;
mod options;
mod orchestrator;
mod report;


pub use error::{AnalysisError, AnalysisResult};
pub use options::AnalysisOptions;
pub use orchestrator::Analyzer;
pub use report::{
    AnalysisOutcome, AnalysisReport, EMPTY_DOCUMENT_MESSAGE, Finding, FindingDetails,
    NO_CANDIDATES_MESSAGE, ReportSummary, format_percent,
};
