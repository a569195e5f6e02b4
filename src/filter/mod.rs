//! Citation / reference filter.
//!
//! Sentences that are quotations, bibliographic references, or too short to carry a
//! meaningful similarity signal are excluded before retrieval. The classifier is a
//! pure heuristic: no model, no state.


use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MIN_ANALYZABLE_TOKENS;

/// Sentence fully wrapped in straight, curly or French quotation marks.
static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*[«"“].+[»"”]\s*$"#).expect("QUOTED regex is valid")
});

/// Parenthetical author-year citation, e.g. `(Dupont, 2019)` or `(Smith et al. 2004)`.
static AUTHOR_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*\p{L}[\p{L}\s.,]*\d{4}\s*\)")
        .expect("AUTHOR_YEAR regex is valid")
});

/// A sentence that survived filtering, with its position in the segmented document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceCandidate {
    /// Sentence text as segmented.
    pub text: String,
    /// Index of the sentence in the document's segmentation output.
    pub position: usize,
}

impl SentenceCandidate {
    /// Creates a candidate.
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// Returns `true` if `sentence` should not be analyzed.
///
/// Rejected: empty or fewer than [`MIN_ANALYZABLE_TOKENS`] whitespace tokens, fully
/// quoted sentences, and sentences carrying a parenthetical author-year citation.
pub fn is_reference(sentence: &str) -> bool {
    let sentence = sentence.trim();

    if sentence.split_whitespace().count() < MIN_ANALYZABLE_TOKENS {
        return true;
    }

    if QUOTED.is_match(sentence) {
        return true;
    }

    AUTHOR_YEAR.is_match(sentence)
}

/// Keeps the analyzable sentences, preserving document order.
pub fn select_candidates<S: AsRef<str>>(sentences: &[S]) -> Vec<SentenceCandidate> {
    sentences
        .iter()
        .enumerate()
        .filter(|(_, s)| !is_reference(s.as_ref()))
        .map(|(position, s)| SentenceCandidate::new(s.as_ref(), position))
        .collect()
}
