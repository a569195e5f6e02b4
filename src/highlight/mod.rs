//! Word-level diff highlighting between a suspect sentence and its source.
//!
//! Both strings are split on whitespace and aligned with a longest-common-subsequence
//! matcher. The alignment is expressed as opcodes over contiguous spans:
//!
//! | Tag       | Suspect side (`markup1`) | Source side (`markup2`) |
//! |-----------|--------------------------|-------------------------|
//! | `Equal`   | matched                  | matched                 |
//! | `Replace` | removed                  | added                   |
//! | `Delete`  | removed                  | -                       |
//! | `Insert`  | -                        | added                   |

#[cfg(test)]
mod tests;

/// Alignment operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    /// `a[i1..i2] == b[j1..j2]`.
    Equal,
    /// `a[i1..i2]` should be replaced by `b[j1..j2]`.
    Replace,
    /// `a[i1..i2]` should be deleted (`j1 == j2`).
    Delete,
    /// `b[j1..j2]` should be inserted at `a[i1]` (`i1 == i2`).
    Insert,
}

/// One contiguous span of the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    fn new(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self {
            tag,
            i1,
            i2,
            j1,
            j2,
        }
    }
}

/// Computes the opcodes transforming `a` into `b`.
///
/// Opcodes cover both sequences completely and in order. Among equally long common
/// subsequences the matcher prefers the one that consumes `a` first, so the output is
/// deterministic.
pub fn opcodes<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let (n, m) = (a.len(), b.len());

    // suffix[i][j] = lcs(a[i..], b[j..])
    let width = m + 1;
    let mut suffix = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            suffix[i * width + j] = if a[i] == b[j] {
                suffix[(i + 1) * width + j + 1] + 1
            } else {
                suffix[(i + 1) * width + j].max(suffix[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut gap_i, mut gap_j) = (0, 0);

    let on_lcs = |i: usize, j: usize| {
        a[i] == b[j] && suffix[i * width + j] == suffix[(i + 1) * width + j + 1] + 1
    };

    while i < n && j < m {
        if on_lcs(i, j) {
            push_gap(&mut ops, gap_i, i, gap_j, j);

            let (start_i, start_j) = (i, j);
            while i < n && j < m && on_lcs(i, j) {
                i += 1;
                j += 1;
            }
            ops.push(Opcode::new(OpTag::Equal, start_i, i, start_j, j));
            gap_i = i;
            gap_j = j;
        } else if suffix[(i + 1) * width + j] >= suffix[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    push_gap(&mut ops, gap_i, n, gap_j, m);
    ops
}

fn push_gap(ops: &mut Vec<Opcode>, i1: usize, i2: usize, j1: usize, j2: usize) {
    let tag = match (i1 < i2, j1 < j2) {
        (true, true) => OpTag::Replace,
        (true, false) => OpTag::Delete,
        (false, true) => OpTag::Insert,
        (false, false) => return,
    };
    ops.push(Opcode::new(tag, i1, i2, j1, j2));
}

/// HTML fragments used to mark each word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupStyle {
    pub matched: (&'static str, &'static str),
    pub removed: (&'static str, &'static str),
    pub added: (&'static str, &'static str),
}

impl Default for MarkupStyle {
    fn default() -> Self {
        Self {
            matched: ("<b>", "</b>"),
            removed: (
                "<span style='color:lightgray; text-decoration: line-through;'>",
                "</span>",
            ),
            added: ("<i style='background-color: #d4edda;'>", "</i>"),
        }
    }
}

/// Renders the suspect and source sentences with default HTML markup.
///
/// Returns `(markup1, markup2)`: matched spans are bold on both sides, words only in
/// `s1` are struck through in `markup1`, words only in `s2` are highlighted in `markup2`.
pub fn highlight(s1: &str, s2: &str) -> (String, String) {
    highlight_with(s1, s2, &MarkupStyle::default())
}

/// Same as [`highlight`] with a custom [`MarkupStyle`].
pub fn highlight_with(s1: &str, s2: &str, style: &MarkupStyle) -> (String, String) {
    let a: Vec<&str> = s1.split_whitespace().collect();
    let b: Vec<&str> = s2.split_whitespace().collect();

    let mut out1: Vec<String> = Vec::new();
    let mut out2: Vec<String> = Vec::new();

    for op in opcodes(&a, &b) {
        let left = &a[op.i1..op.i2];
        let right = &b[op.j1..op.j2];

        match op.tag {
            OpTag::Equal => {
                out1.push(wrap_words(left, style.matched));
                out2.push(wrap_words(right, style.matched));
            }
            OpTag::Replace => {
                out1.push(wrap_words(left, style.removed));
                out2.push(wrap_words(right, style.added));
            }
            OpTag::Delete => out1.push(wrap_words(left, style.removed)),
            OpTag::Insert => out2.push(wrap_words(right, style.added)),
        }
    }

    (out1.join(" "), out2.join(" "))
}

fn wrap_words(words: &[&str], (open, close): (&str, &str)) -> String {
    words
        .iter()
        .map(|w| format!("{open}{}{close}", escape_html(w)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(word: &str) -> std::borrow::Cow<'_, str> {
    if !word.contains(['&', '<', '>']) {
        return std::borrow::Cow::Borrowed(word);
    }
    let mut out = String::with_capacity(word.len() + 8);
    for c in word.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    std::borrow::Cow::Owned(out)
}
