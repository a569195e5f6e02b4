//! Lexical overlap metrics.
//!
//! Three independent signals, each in `[0, 1]` and symmetric in their inputs:
//!
//! - [`levenshtein_ratio`]: character-level edit similarity
//! - [`token_jaccard`]: Jaccard over lowercase whitespace tokens
//! - [`ngram_jaccard`]: Jaccard over sliding windows of `n` lowercase tokens

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::constants::COMPOSITE_NGRAM_SIZE;

/// Normalized edit similarity between two strings.
///
/// Computed over Unicode scalar values as `1 - indel_distance / (len1 + len2)`, where the
/// indel distance counts insertions and deletions only (a substitution costs two). This
/// equals `2 * lcs / (len1 + len2)`. Identical strings score `1.0` (including two empty
/// strings); strings with no common character score `0.0`.
pub fn levenshtein_ratio(s1: &str, s2: &str) -> f32 {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let lcs = lcs_len(&a, &b);
    (2 * lcs) as f32 / total as f32
}

/// Jaccard similarity of the lowercase whitespace-token sets; `0.0` when both are empty.
pub fn token_jaccard(s1: &str, s2: &str) -> f32 {
    let t1 = lowercase_tokens(s1);
    let t2 = lowercase_tokens(s2);

    let a: HashSet<&str> = t1.iter().map(String::as_str).collect();
    let b: HashSet<&str> = t2.iter().map(String::as_str).collect();

    jaccard(&a, &b)
}

/// Jaccard similarity over sliding windows of `n` lowercase tokens.
///
/// Returns `0.0` when `n == 0` or when either sentence has fewer than `n` tokens.
pub fn ngram_jaccard(s1: &str, s2: &str, n: usize) -> f32 {
    if n == 0 {
        return 0.0;
    }

    let t1 = lowercase_tokens(s1);
    let t2 = lowercase_tokens(s2);

    if t1.len() < n || t2.len() < n {
        return 0.0;
    }

    let a: HashSet<&[String]> = t1.windows(n).collect();
    let b: HashSet<&[String]> = t2.windows(n).collect();

    jaccard(&a, &b)
}

/// The three lexical signals between a suspect sentence and its best source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalMetrics {
    /// [`levenshtein_ratio`].
    pub levenshtein: f32,
    /// [`token_jaccard`].
    pub jaccard: f32,
    /// [`ngram_jaccard`] with `n = ngram_size`.
    pub ngram_jaccard: f32,
    /// Window size used for `ngram_jaccard`.
    pub ngram_size: usize,
}

impl LexicalMetrics {
    /// Computes all three metrics, with the n-gram window used by the composite score.
    pub fn compute(s1: &str, s2: &str) -> Self {
        Self::compute_with_ngram(s1, s2, COMPOSITE_NGRAM_SIZE)
    }

    /// Computes all three metrics with an explicit n-gram window.
    pub fn compute_with_ngram(s1: &str, s2: &str, ngram_size: usize) -> Self {
        Self {
            levenshtein: levenshtein_ratio(s1, s2),
            jaccard: token_jaccard(s1, s2),
            ngram_jaccard: ngram_jaccard(s1, s2, ngram_size),
            ngram_size,
        }
    }
}

fn lowercase_tokens(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_lowercase).collect()
}

fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f32 / union as f32
}

/// Length of the longest common subsequence (two-row DP).
fn lcs_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
