use super::error::ScoringError;
use super::scorer::{CompositeScorer, best_hit_index};
use super::types::{CompositeScore, ScoringWeights, Verdict, classify};
use crate::lexical::LexicalMetrics;

fn metrics(levenshtein: f32, jaccard: f32, ngram_jaccard: f32) -> LexicalMetrics {
    LexicalMetrics {
        levenshtein,
        jaccard,
        ngram_jaccard,
        ngram_size: 3,
    }
}

#[test]
fn test_classify_boundaries() {
    assert_eq!(classify(0.60), Verdict::ThematicSimilarity);
    assert_eq!(classify(0.5999), Verdict::NotSuspect);
    assert_eq!(classify(0.70), Verdict::StrongParaphrase);
    assert_eq!(classify(0.6999), Verdict::ThematicSimilarity);
    assert_eq!(classify(0.8499), Verdict::StrongParaphrase);
    assert_eq!(classify(0.85), Verdict::NearIdentical);
    assert_eq!(classify(1.10), Verdict::NearIdentical);
}

#[test]
fn test_classify_non_finite_is_not_suspect() {
    assert_eq!(classify(f32::NAN), Verdict::NotSuspect);
    assert_eq!(classify(f32::INFINITY), Verdict::NotSuspect);
    assert_eq!(classify(f32::NEG_INFINITY), Verdict::NotSuspect);
}

#[test]
fn test_classify_negative_is_not_suspect() {
    assert_eq!(classify(-0.5), Verdict::NotSuspect);
    assert_eq!(classify(0.0), Verdict::NotSuspect);
}

#[test]
fn test_classify_exactly_one_band() {
    let mut score = -0.2_f32;
    while score < 1.3 {
        let v = classify(score);
        let bands = [
            score >= 0.85,
            (0.70..0.85).contains(&score),
            (0.60..0.70).contains(&score),
            score < 0.60,
        ];
        assert_eq!(bands.iter().filter(|b| **b).count(), 1);
        let expected = Verdict::ALL[bands.iter().position(|b| *b).unwrap()];
        assert_eq!(v, expected, "score {score}");
        score += 0.0137;
    }
}

#[test]
fn test_verdict_labels_roundtrip() {
    for v in Verdict::ALL {
        assert_eq!(Verdict::from_label(v.label()), Some(v));
        assert_eq!(v.to_string(), v.label());
    }
    assert_eq!(Verdict::from_label("nope"), None);
}

#[test]
fn test_verdict_serializes_as_label() {
    let json = serde_json::to_string(&Verdict::NearIdentical).unwrap();
    assert_eq!(json, "\"Texte très similaire / Copié-collé\"");

    let back: Verdict = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Verdict::NearIdentical);

    assert!(serde_json::from_str::<Verdict>("\"inconnu\"").is_err());
}

#[test]
fn test_verdict_is_suspect() {
    assert!(Verdict::NearIdentical.is_suspect());
    assert!(Verdict::ThematicSimilarity.is_suspect());
    assert!(!Verdict::NotSuspect.is_suspect());
}

#[test]
fn test_default_weights_are_observed_formula() {
    let w = ScoringWeights::default();
    assert_eq!(w.cross_encoder, 0.65);
    assert_eq!(w.levenshtein, 0.15);
    assert_eq!(w.token_jaccard, 0.15);
    assert_eq!(w.ngram_jaccard, 0.15);
    assert!((w.total() - 1.10).abs() < 1e-6);
}

#[test]
fn test_weights_validate_rejects_negative_and_nan() {
    let negative = ScoringWeights {
        levenshtein: -0.1,
        ..Default::default()
    };
    assert!(matches!(
        negative.validate(),
        Err(ScoringError::InvalidWeights { .. })
    ));

    let nan = ScoringWeights {
        cross_encoder: f32::NAN,
        ..Default::default()
    };
    assert!(CompositeScorer::new(nan).is_err());
}

#[test]
fn test_composite_all_ones_is_weight_sum() {
    let scorer = CompositeScorer::default();
    let value = scorer.composite(1.0, &metrics(1.0, 1.0, 1.0));
    assert!((value - 1.10).abs() < 1e-6);
}

#[test]
fn test_composite_all_zero_is_zero() {
    let scorer = CompositeScorer::default();
    assert_eq!(scorer.composite(0.0, &metrics(0.0, 0.0, 0.0)), 0.0);
}

#[test]
fn test_composite_weighted_sum() {
    let scorer = CompositeScorer::default();
    let value = scorer.composite(0.8, &metrics(0.5, 0.4, 0.2));
    let expected = 0.65 * 0.8 + 0.15 * 0.5 + 0.15 * 0.4 + 0.15 * 0.2;
    assert!((value - expected).abs() < 1e-6);
}

#[test]
fn test_composite_monotonic_in_each_signal() {
    let scorer = CompositeScorer::default();
    let base = (0.4_f32, 0.3_f32, 0.2_f32, 0.1_f32);
    let composite =
        |c: f32, l: f32, j: f32, n: f32| scorer.composite(c, &metrics(l, j, n));
    let reference = composite(base.0, base.1, base.2, base.3);

    for step in [0.0_f32, 0.01, 0.1, 0.5] {
        assert!(composite(base.0 + step, base.1, base.2, base.3) >= reference);
        assert!(composite(base.0, base.1 + step, base.2, base.3) >= reference);
        assert!(composite(base.0, base.1, base.2 + step, base.3) >= reference);
        assert!(composite(base.0, base.1, base.2, base.3 + step) >= reference);
    }
}

#[test]
fn test_custom_weights() {
    let scorer = CompositeScorer::new(ScoringWeights {
        cross_encoder: 1.0,
        levenshtein: 0.0,
        token_jaccard: 0.0,
        ngram_jaccard: 0.0,
    })
    .unwrap();

    let score = scorer.score(0.72, metrics(1.0, 1.0, 1.0));
    assert!((score.value - 0.72).abs() < 1e-6);
    assert_eq!(score.verdict, Verdict::StrongParaphrase);
}

#[test]
fn test_score_carries_signals() {
    let scorer = CompositeScorer::default();
    let lexical = metrics(1.0, 1.0, 1.0);
    let score = scorer.score(0.99, lexical);

    assert_eq!(score.cross_score, 0.99);
    assert_eq!(score.lexical, lexical);
    assert_eq!(score.verdict, Verdict::NearIdentical);
    assert!(score.meets(0.6));
    assert!(score.to_string().contains("NEAR_IDENTICAL"));
}

#[test]
fn test_composite_meets_threshold() {
    let score = CompositeScore {
        value: 0.5999,
        verdict: classify(0.5999),
        cross_score: 0.0,
        lexical: metrics(0.0, 0.0, 0.0),
    };
    assert!(!score.meets(0.6));
    assert!(score.meets(0.5));
}

#[test]
fn test_best_hit_index_argmax() {
    assert_eq!(best_hit_index(&[0.1, 0.9, 0.3]), Some(1));
}

#[test]
fn test_best_hit_index_ties_go_to_first() {
    assert_eq!(best_hit_index(&[0.2, 0.7, 0.7, 0.1]), Some(1));
    assert_eq!(best_hit_index(&[0.5, 0.5, 0.5]), Some(0));
}

#[test]
fn test_best_hit_index_skips_nan() {
    assert_eq!(best_hit_index(&[f32::NAN, 0.3, 0.2]), Some(1));
    assert_eq!(best_hit_index(&[f32::NAN, f32::NAN]), None);
}

#[test]
fn test_best_hit_index_empty() {
    assert_eq!(best_hit_index(&[]), None);
}

#[test]
fn test_best_hit_index_negative_scores() {
    assert_eq!(best_hit_index(&[-3.0, -1.0, -2.0]), Some(1));
}
