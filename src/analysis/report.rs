use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::scoring::Verdict;

pub const EMPTY_DOCUMENT_MESSAGE: &str = "Le document est vide ou ne contient pas de texte.";
pub const NO_CANDIDATES_MESSAGE: &str = "Aucune phrase pertinente à analyser après filtrage.";

fn round3<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((f64::from(*value) * 1000.0).round() / 1000.0)
}

fn percent1<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_percent(*value))
}

/// `0.3333` becomes `"33.3%"`.
pub fn format_percent(ratio: f32) -> String {
    format!("{:.1}%", f64::from(ratio) * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportSummary {
    #[serde(rename = "phrases_analysees")]
    pub analyzed: usize,
    #[serde(rename = "phrases_suspectes")]
    pub suspect: usize,
    /// `suspect / analyzed`, 0 when nothing was analyzed.
    #[serde(rename = "ratio_suspicion", serialize_with = "percent1")]
    pub suspicion_ratio: f32,
}

impl ReportSummary {
    pub fn new(analyzed: usize, suspect: usize) -> Self {
        let suspicion_ratio = if analyzed > 0 {
            suspect as f32 / analyzed as f32
        } else {
            0.0
        };
        Self {
            analyzed,
            suspect,
            suspicion_ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FindingDetails {
    #[serde(rename = "score_cross_encoder", serialize_with = "round3")]
    pub cross_score: f32,
    pub levenshtein: f32,
    pub jaccard: f32,
    #[serde(rename = "score_ngram_jaccard", serialize_with = "round3")]
    pub ngram_jaccard: f32,
}

/// One suspect sentence matched against its best corpus source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    #[serde(rename = "phrase_suspecte")]
    pub sentence: String,
    #[serde(skip)]
    pub position: usize,
    #[serde(rename = "score_composite", serialize_with = "round3")]
    pub composite: f32,
    pub verdict: Verdict,
    pub details: FindingDetails,
    #[serde(rename = "source_trouvee")]
    pub source_text: String,
    #[serde(rename = "document_source")]
    pub source_title: String,
    #[serde(skip)]
    pub corpus_id: usize,
    #[serde(rename = "html_diff_suspecte")]
    pub diff_suspect: String,
    #[serde(rename = "html_diff_source")]
    pub diff_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    /// Sorted by descending composite score; equal scores keep document order.
    pub findings: Vec<Finding>,
}

/// What analyzing one document produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Report(AnalysisReport),
    /// No extractable text.
    EmptyDocument,
    /// Every sentence was filtered out before retrieval.
    NoCandidates,
}

impl AnalysisOutcome {
    /// Informational message for the non-report outcomes.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AnalysisOutcome::Report(_) => None,
            AnalysisOutcome::EmptyDocument => Some(EMPTY_DOCUMENT_MESSAGE),
            AnalysisOutcome::NoCandidates => Some(NO_CANDIDATES_MESSAGE),
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Report(report) => Some(report),
            _ => None,
        }
    }

    pub fn into_report(self) -> Option<AnalysisReport> {
        match self {
            AnalysisOutcome::Report(report) => Some(report),
            _ => None,
        }
    }
}

/// A report serializes as itself; the other outcomes as `{"message": ...}`.
impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnalysisOutcome::Report(report) => report.serialize(serializer),
            other => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("message", other.message().unwrap_or_default())?;
                map.end()
            }
        }
    }
}
