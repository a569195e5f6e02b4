use std::path::Path;

use tracing::{debug, info, instrument};

use crate::corpus::CorpusSnapshot;
use crate::embedding::{CrossEncoder, Embedder};
use crate::extract::{FileExtractor, SentenceSegmenter, TextExtractor};
use crate::filter::{SentenceCandidate, select_candidates};
use crate::highlight::{MarkupStyle, highlight_with};
use crate::index::{RetrievalHit, VectorIndex};
use crate::lexical::LexicalMetrics;
use crate::scoring::{CompositeScorer, best_hit_index};

use super::error::{AnalysisError, AnalysisResult};
use super::options::AnalysisOptions;
use super::report::{AnalysisOutcome, AnalysisReport, Finding, FindingDetails, ReportSummary};

/// Retrieve, rerank and score the sentences of one document against a corpus snapshot.
///
/// Borrows every collaborator; the snapshot is read-only for the whole call.
pub struct Analyzer<'a> {
    embedder: &'a dyn Embedder,
    reranker: &'a dyn CrossEncoder,
    segmenter: &'a dyn SentenceSegmenter,
    extractor: &'a dyn TextExtractor,
    corpus: &'a CorpusSnapshot,
    style: MarkupStyle,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        embedder: &'a dyn Embedder,
        reranker: &'a dyn CrossEncoder,
        segmenter: &'a dyn SentenceSegmenter,
        corpus: &'a CorpusSnapshot,
    ) -> Self {
        Self {
            embedder,
            reranker,
            segmenter,
            extractor: &FileExtractor,
            corpus,
            style: MarkupStyle::default(),
        }
    }

    /// Replaces the extension-based [`FileExtractor`] used by `analyze_file`.
    pub fn with_extractor(mut self, extractor: &'a dyn TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_style(mut self, style: MarkupStyle) -> Self {
        self.style = style;
        self
    }

    /// Extracts `path` and analyzes its text.
    #[instrument(skip(self, options), fields(path = %path.display()))]
    pub fn analyze_file(
        &self,
        path: &Path,
        options: &AnalysisOptions,
    ) -> AnalysisResult<AnalysisOutcome> {
        let text = self.extractor.extract(path)?;
        self.analyze_text(&text, options)
    }

    /// Segments and filters `text`, then analyzes the surviving sentences.
    pub fn analyze_text(
        &self,
        text: &str,
        options: &AnalysisOptions,
    ) -> AnalysisResult<AnalysisOutcome> {
        options.validate()?;

        if text.trim().is_empty() {
            info!("Document has no extractable text");
            return Ok(AnalysisOutcome::EmptyDocument);
        }

        let sentences = self.segmenter.segment(text);
        let candidates = select_candidates(&sentences);
        debug!(
            sentences = sentences.len(),
            candidates = candidates.len(),
            locale = self.segmenter.locale(),
            "Sentences filtered"
        );

        if candidates.is_empty() {
            info!(sentences = sentences.len(), "No analyzable sentences after filtering");
            return Ok(AnalysisOutcome::NoCandidates);
        }

        self.analyze_candidates(&candidates, options)
            .map(AnalysisOutcome::Report)
    }

    /// Runs retrieval, reranking and scoring over already filtered candidates.
    #[instrument(skip_all, fields(candidates = candidates.len(), top_k = options.top_k))]
    pub fn analyze_candidates(
        &self,
        candidates: &[SentenceCandidate],
        options: &AnalysisOptions,
    ) -> AnalysisResult<AnalysisReport> {
        options.validate()?;
        let scorer = CompositeScorer::new(options.weights)?;

        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        check_count("embedder", texts.len(), vectors.len())?;

        let index = self.corpus.index();
        let retrieved = index.search(&vectors, options.top_k)?;
        check_count("index", texts.len(), retrieved.len())?;

        let mut findings = Vec::new();
        for (candidate, hits) in candidates.iter().zip(&retrieved) {
            if let Some(finding) = self.evaluate(candidate, hits, &scorer, options)? {
                findings.push(finding);
            }
        }

        // Stable: equal composites keep document order.
        findings.sort_by(|a, b| b.composite.total_cmp(&a.composite));

        let summary = ReportSummary::new(candidates.len(), findings.len());
        info!(
            analyzed = summary.analyzed,
            suspect = summary.suspect,
            ratio = summary.suspicion_ratio,
            "Analysis report produced"
        );

        Ok(AnalysisReport { summary, findings })
    }

    /// Reranks one sentence's hits and scores the best one. `None` when nothing
    /// was retrieved or the best hit scores under the threshold.
    fn evaluate(
        &self,
        candidate: &SentenceCandidate,
        hits: &[RetrievalHit],
        scorer: &CompositeScorer,
        options: &AnalysisOptions,
    ) -> AnalysisResult<Option<Finding>> {
        if hits.is_empty() {
            return Ok(None);
        }

        let mut pairs = Vec::with_capacity(hits.len());
        for hit in hits {
            let entry = self
                .corpus
                .get(hit.corpus_id)
                .ok_or(AnalysisError::DanglingHit {
                    corpus_id: hit.corpus_id,
                    len: self.corpus.len(),
                })?;
            pairs.push((candidate.text.as_str(), entry.content_block.as_str()));
        }

        let cross_scores = self.reranker.score_pairs(&pairs)?;
        check_count("reranker", pairs.len(), cross_scores.len())?;

        let Some(best) = best_hit_index(&cross_scores) else {
            return Ok(None);
        };
        let corpus_id = hits[best].corpus_id;
        let source = pairs[best].1;

        let lexical = LexicalMetrics::compute(&candidate.text, source);
        let score = scorer.score(cross_scores[best], lexical);

        debug!(
            position = candidate.position,
            corpus_id,
            retrieval_rank = best,
            composite = score.value,
            verdict = score.verdict.debug_status(),
            "Sentence scored"
        );

        if !score.meets(options.min_verdict_score) {
            return Ok(None);
        }

        let (diff_suspect, diff_source) = highlight_with(&candidate.text, source, &self.style);
        let entry = &self.corpus.entries()[corpus_id];

        Ok(Some(Finding {
            sentence: candidate.text.clone(),
            position: candidate.position,
            composite: score.value,
            verdict: score.verdict,
            details: FindingDetails {
                cross_score: score.cross_score,
                levenshtein: lexical.levenshtein,
                jaccard: lexical.jaccard,
                ngram_jaccard: lexical.ngram_jaccard,
            },
            source_text: entry.content_block.clone(),
            source_title: entry.title.clone(),
            corpus_id,
            diff_suspect,
            diff_source,
        }))
    }
}

fn check_count(capability: &'static str, expected: usize, actual: usize) -> AnalysisResult<()> {
    if expected != actual {
        return Err(AnalysisError::ResultCount {
            capability,
            expected,
            actual,
        });
    }
    Ok(())
}
