use unicode_segmentation::UnicodeSegmentation;

use super::SentenceSegmenter;
use super::normalize::normalize_whitespace;

pub const DEFAULT_LOCALE: &str = "french";

/// UAX #29 sentence boundaries.
///
/// The locale is carried for callers and logs; boundary rules are the
/// language-neutral Unicode ones. Closing quotes and parentheses that UAX #29
/// pushes to the start of the next sentence (French `« … fin. » Suite.`) are
/// moved back to the sentence they close.
#[derive(Debug, Clone)]
pub struct UnicodeSegmenter {
    locale: String,
}

impl Default for UnicodeSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl UnicodeSegmenter {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl SentenceSegmenter for UnicodeSegmenter {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn segment(&self, text: &str) -> Vec<String> {
        let text = normalize_whitespace(text);
        let mut pieces: Vec<String> = Vec::new();

        for piece in text.unicode_sentences() {
            let rest = match pieces.last_mut() {
                Some(previous) => &piece[take_closers(previous, piece)..],
                None => piece,
            };
            if !rest.trim().is_empty() {
                pieces.push(rest.to_string());
            }
        }

        pieces
            .iter()
            .map(|s| normalize_whitespace(s))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Whether `c` at the start of a piece closes something still open in `previous`.
fn closes(previous: &str, c: char) -> bool {
    match c {
        '»' | '”' => true,
        '"' => previous.matches('"').count() % 2 == 1,
        ')' => previous.matches('(').count() > previous.matches(')').count(),
        _ => false,
    }
}

/// Appends the leading closers of `piece` to `previous`; returns the byte length taken.
fn take_closers(previous: &mut String, piece: &str) -> usize {
    let mut taken = 0;
    for (i, c) in piece.char_indices() {
        if c.is_whitespace() {
            continue;
        }
        if !closes(previous, c) {
            break;
        }
        let end = i + c.len_utf8();
        previous.push_str(&piece[taken..end]);
        taken = end;
    }
    taken
}
