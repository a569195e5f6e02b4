mod common;

use std::sync::Arc;

use common::{BRIDGE, CLIMATE, MARKETS, OCEANS, TestWorkspace};
use plagiat::analysis::{AnalysisError, AnalysisOptions, AnalysisOutcome};
use plagiat::context::ContextError;
use plagiat::embedding::{FailingCrossEncoder, MockCrossEncoder, Reranker};
use plagiat::scoring::{ScoringWeights, Verdict};

fn cross_only() -> AnalysisOptions {
    AnalysisOptions::default().with_weights(ScoringWeights {
        cross_encoder: 1.0,
        levenshtein: 0.0,
        token_jaccard: 0.0,
        ngram_jaccard: 0.0,
    })
}

#[test]
fn test_exact_copy_is_flagged_near_identical() {
    let ws = TestWorkspace::new();
    let context = ws.context(&[(CLIMATE, "doc1")], Arc::new(Reranker::stub().unwrap()));

    let outcome = context
        .analyze_text(CLIMATE, &AnalysisOptions::default())
        .unwrap();
    let report = outcome.report().expect("a report");

    assert_eq!(report.summary.analyzed, 1);
    assert_eq!(report.summary.suspect, 1);
    assert_eq!(report.findings.len(), 1);

    let finding = &report.findings[0];
    assert!(finding.details.cross_score > 0.95);
    assert_eq!(finding.details.levenshtein, 1.0);
    assert_eq!(finding.details.jaccard, 1.0);
    assert_eq!(finding.details.ngram_jaccard, 1.0);
    assert!(finding.composite >= 0.85);
    assert_eq!(finding.verdict, Verdict::NearIdentical);
    assert_eq!(finding.source_title, "doc1");
}

#[test]
fn test_unrelated_sentence_is_not_reported() {
    let ws = TestWorkspace::new();
    let context = ws.context(
        &[(CLIMATE, "doc1"), (OCEANS, "doc2")],
        Arc::new(Reranker::stub().unwrap()),
    );

    let outcome = context
        .analyze_text(MARKETS, &AnalysisOptions::default())
        .unwrap();
    let report = outcome.report().expect("a report");

    assert_eq!(report.summary.analyzed, 1);
    assert_eq!(report.summary.suspect, 0);
    assert!(report.findings.is_empty());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["summary"]["phrases_suspectes"], 0);
    assert_eq!(json["summary"]["ratio_suspicion"], "0.0%");
}

#[test]
fn test_verdict_bands_through_pipeline() {
    let cases = [
        (0.85, Some(Verdict::NearIdentical)),
        (0.8499, Some(Verdict::StrongParaphrase)),
        (0.70, Some(Verdict::StrongParaphrase)),
        (0.60, Some(Verdict::ThematicSimilarity)),
        (0.5999, None),
    ];

    for (score, expected) in cases {
        let ws = TestWorkspace::new();
        let context = ws.context(
            &[(BRIDGE, "ponts.pdf")],
            Arc::new(MockCrossEncoder::uniform(score)),
        );

        let outcome = context.analyze_text(BRIDGE, &cross_only()).unwrap();
        let report = outcome.report().expect("a report");
        let verdict = report.findings.first().map(|f| f.verdict);
        assert_eq!(verdict, expected, "cross score {score}");
    }
}

#[test]
fn test_findings_ordered_by_score() {
    let ws = TestWorkspace::new();
    let reranker = MockCrossEncoder::uniform(0.9)
        .with_score(OCEANS, 0.65)
        .with_score(BRIDGE, 0.75);
    let context = ws.context(
        &[(OCEANS, "a"), (BRIDGE, "b"), (MARKETS, "c")],
        Arc::new(reranker),
    );

    let text = format!("{OCEANS} {BRIDGE} {MARKETS}");
    let outcome = context.analyze_text(&text, &cross_only()).unwrap();
    let report = outcome.report().unwrap();

    let order: Vec<&str> = report.findings.iter().map(|f| f.sentence.as_str()).collect();
    assert_eq!(order, vec![MARKETS, BRIDGE, OCEANS]);
    let positions: Vec<usize> = report.findings.iter().map(|f| f.position).collect();
    assert_eq!(positions, vec![2, 1, 0]);
}

#[test]
fn test_reranker_failure_yields_no_report() {
    let ws = TestWorkspace::new();
    let context = ws.context(&[(CLIMATE, "doc1")], Arc::new(FailingCrossEncoder));

    let result = context.analyze_text(CLIMATE, &AnalysisOptions::default());
    assert!(matches!(
        result,
        Err(ContextError::Analysis(AnalysisError::Reranker(_)))
    ));
}

#[test]
fn test_reranker_called_once_per_candidate() {
    let ws = TestWorkspace::new();
    let reranker = Arc::new(MockCrossEncoder::uniform(0.1));
    let context = ws.context(&[(CLIMATE, "doc1"), (OCEANS, "doc2")], reranker.clone());

    let text = format!("{MARKETS} {BRIDGE} Trop court.");
    context
        .analyze_text(&text, &AnalysisOptions::default())
        .unwrap();
    assert_eq!(reranker.calls(), 2);
}

#[test]
fn test_file_outcomes_serialize_to_messages() {
    let ws = TestWorkspace::new();
    let context = ws.context(&[(CLIMATE, "doc1")], Arc::new(Reranker::stub().unwrap()));

    let empty = ws.write_document("vide.txt", "\n\n");
    let outcome = context
        .analyze_file(&empty, &AnalysisOptions::default())
        .unwrap();
    assert_eq!(outcome, AnalysisOutcome::EmptyDocument);
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(
        json["message"],
        "Le document est vide ou ne contient pas de texte."
    );

    let short = ws.write_document("notes.txt", "Bref. Trop court ici. Voir (Dupont, 2019).");
    let outcome = context
        .analyze_file(&short, &AnalysisOptions::default())
        .unwrap();
    assert_eq!(outcome, AnalysisOutcome::NoCandidates);
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(
        json["message"],
        "Aucune phrase pertinente à analyser après filtrage."
    );
}

#[test]
fn test_broken_pdf_is_extraction_error() {
    let ws = TestWorkspace::new();
    let context = ws.context(&[(CLIMATE, "doc1")], Arc::new(Reranker::stub().unwrap()));

    let pdf = ws.write_document("rapport.pdf", "plain text pretending to be a PDF");
    assert!(matches!(
        context.analyze_file(&pdf, &AnalysisOptions::default()),
        Err(ContextError::Analysis(AnalysisError::Extraction(_)))
    ));
}
