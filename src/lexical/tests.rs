use super::*;

const EPS: f32 = 1e-6;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

#[test]
fn test_levenshtein_identical_is_one() {
    for s in ["a", "Le changement climatique", "été à l'école", "  spaced  "] {
        assert!(approx(levenshtein_ratio(s, s), 1.0), "failed for {s:?}");
    }
}

#[test]
fn test_levenshtein_both_empty_is_one() {
    assert!(approx(levenshtein_ratio("", ""), 1.0));
}

#[test]
fn test_levenshtein_one_empty_is_zero() {
    assert!(approx(levenshtein_ratio("abc", ""), 0.0));
    assert!(approx(levenshtein_ratio("", "abc"), 0.0));
}

#[test]
fn test_levenshtein_disjoint_is_zero() {
    assert!(approx(levenshtein_ratio("abc", "xyz"), 0.0));
}

#[test]
fn test_levenshtein_known_value() {
    // lcs("kitten", "sitting") = "ittn" (4) -> 8 / 13
    assert!(approx(levenshtein_ratio("kitten", "sitting"), 8.0 / 13.0));
}

#[test]
fn test_levenshtein_counts_chars_not_bytes() {
    // "é" is two bytes but one char: lcs("été", "ete") = "t" (1) -> 2 / 6
    assert!(approx(levenshtein_ratio("été", "ete"), 2.0 / 6.0));
}

#[test]
fn test_levenshtein_symmetric() {
    let pairs = [
        ("kitten", "sitting"),
        ("la biodiversité", "biodiversité mondiale"),
        ("", "x"),
    ];
    for (a, b) in pairs {
        assert!(approx(levenshtein_ratio(a, b), levenshtein_ratio(b, a)));
    }
}

#[test]
fn test_token_jaccard_identical_is_one() {
    let s = "Le changement climatique affecte la biodiversité mondiale";
    assert!(approx(token_jaccard(s, s), 1.0));
}

#[test]
fn test_token_jaccard_is_case_insensitive() {
    assert!(approx(token_jaccard("Le Chat Noir", "le chat noir"), 1.0));
}

#[test]
fn test_token_jaccard_uses_sets() {
    // {a, b} vs {a, c} -> 1 / 3, duplicates ignored
    assert!(approx(token_jaccard("a a b", "a c c"), 1.0 / 3.0));
}

#[test]
fn test_token_jaccard_empty_union_is_zero() {
    assert!(approx(token_jaccard("", ""), 0.0));
    assert!(approx(token_jaccard("   ", "\t"), 0.0));
}

#[test]
fn test_token_jaccard_disjoint_is_zero() {
    assert!(approx(token_jaccard("alpha beta", "gamma delta"), 0.0));
}

#[test]
fn test_ngram_jaccard_too_few_tokens_is_zero() {
    for n in 1..6 {
        let short: Vec<&str> = ["un", "deux", "trois", "quatre", "cinq"][..n - 1].to_vec();
        let short = short.join(" ");
        let long = "un deux trois quatre cinq six sept";
        assert!(approx(ngram_jaccard(&short, long, n), 0.0), "n = {n}");
        assert!(approx(ngram_jaccard(long, &short, n), 0.0), "n = {n}");
    }
}

#[test]
fn test_ngram_jaccard_zero_n_is_zero() {
    assert!(approx(ngram_jaccard("a b c", "a b c", 0), 0.0));
}

#[test]
fn test_ngram_jaccard_identical_is_one() {
    let s = "Le changement climatique affecte la biodiversité mondiale";
    assert!(approx(ngram_jaccard(s, s, 3), 1.0));
    assert!(approx(ngram_jaccard(s, s, 1), 1.0));
}

#[test]
fn test_ngram_jaccard_exact_token_count() {
    assert!(approx(ngram_jaccard("a b c", "A B C", 3), 1.0));
}

#[test]
fn test_ngram_jaccard_partial_overlap() {
    // trigrams: {abc, bcd} vs {bcd, cde} -> 1 / 3
    assert!(approx(ngram_jaccard("a b c d", "b c d e", 3), 1.0 / 3.0));
}

#[test]
fn test_ngram_n1_matches_token_jaccard() {
    let a = "les océans absorbent la chaleur";
    let b = "la chaleur est absorbée par les océans";
    assert!(approx(ngram_jaccard(a, b, 1), token_jaccard(a, b)));
}

#[test]
fn test_lexical_metrics_compute_uses_trigrams() {
    let metrics = LexicalMetrics::compute("a b c d", "b c d e");
    assert_eq!(metrics.ngram_size, 3);
    assert!(approx(metrics.ngram_jaccard, 1.0 / 3.0));
    assert!(approx(metrics.jaccard, 3.0 / 5.0));
}

#[test]
fn test_metrics_bounded() {
    let pairs = [
        ("", ""),
        ("x", ""),
        ("Le chat dort", "Le chien aboie fort"),
        ("a b c d e f", "f e d c b a"),
    ];
    for (a, b) in pairs {
        let m = LexicalMetrics::compute(a, b);
        for v in [m.levenshtein, m.jaccard, m.ngram_jaccard] {
            assert!((0.0..=1.0).contains(&v), "{v} out of range for {a:?}/{b:?}");
        }
    }
}

#[test]
fn test_lcs_len_basic() {
    let a: Vec<char> = "ABCBDAB".chars().collect();
    let b: Vec<char> = "BDCABA".chars().collect();
    assert_eq!(lcs_len(&a, &b), 4);
    assert_eq!(lcs_len::<char>(&[], &b), 0);
}
