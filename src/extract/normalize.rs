use std::sync::LazyLock;

use regex::Regex;

static OPERATOR_BETWEEN_SYMBOLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\s][=+\-*/][^a-zA-Z0-9\s]").expect("operator regex is valid")
});

static MATH_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(sqrt|sin|cos|tan|log|ln)\b").expect("math word regex is valid")
});

const MATH_GLYPHS: &[char] = &[
    '^', '∑', '√', 'π', '∆', 'µ', '∫', '≈', '≤', '≥', '≠', '≃', '≅',
];

/// Replaces line breaks with spaces and collapses whitespace runs.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-delimited token count.
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True for sentences that look like formulas rather than prose.
pub fn contains_math_expression(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(MATH_GLYPHS)
        || MATH_WORD.is_match(&lower)
        || OPERATOR_BETWEEN_SYMBOLS.is_match(&lower)
}
