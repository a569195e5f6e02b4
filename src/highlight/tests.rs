use super::*;

fn words(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

#[test]
fn test_opcodes_identical_is_single_equal() {
    let a = words("le chat dort");
    let ops = opcodes(&a, &a);
    assert_eq!(ops, vec![Opcode::new(OpTag::Equal, 0, 3, 0, 3)]);
}

#[test]
fn test_opcodes_both_empty() {
    let a: Vec<&str> = vec![];
    assert!(opcodes(&a, &a).is_empty());
}

#[test]
fn test_opcodes_one_side_empty() {
    let a = words("un deux");
    let empty: Vec<&str> = vec![];
    assert_eq!(
        opcodes(&a, &empty),
        vec![Opcode::new(OpTag::Delete, 0, 2, 0, 0)]
    );
    assert_eq!(
        opcodes(&empty, &a),
        vec![Opcode::new(OpTag::Insert, 0, 0, 0, 2)]
    );
}

#[test]
fn test_opcodes_replace_in_middle() {
    let a = words("le chat noir dort");
    let b = words("le chien noir dort");
    assert_eq!(
        opcodes(&a, &b),
        vec![
            Opcode::new(OpTag::Equal, 0, 1, 0, 1),
            Opcode::new(OpTag::Replace, 1, 2, 1, 2),
            Opcode::new(OpTag::Equal, 2, 4, 2, 4),
        ]
    );
}

#[test]
fn test_opcodes_insert_and_delete() {
    let a = words("a b c");
    let b = words("a c d");
    assert_eq!(
        opcodes(&a, &b),
        vec![
            Opcode::new(OpTag::Equal, 0, 1, 0, 1),
            Opcode::new(OpTag::Delete, 1, 2, 1, 1),
            Opcode::new(OpTag::Equal, 2, 3, 1, 2),
            Opcode::new(OpTag::Insert, 3, 3, 2, 3),
        ]
    );
}

#[test]
fn test_opcodes_cover_both_sequences() {
    let a = words("the quick brown fox jumps over the lazy dog");
    let b = words("a quick red fox leaped over lazy dogs today");
    let ops = opcodes(&a, &b);

    let mut expected_i = 0;
    let mut expected_j = 0;
    for op in &ops {
        assert_eq!(op.i1, expected_i);
        assert_eq!(op.j1, expected_j);
        expected_i = op.i2;
        expected_j = op.j2;
    }
    assert_eq!(expected_i, a.len());
    assert_eq!(expected_j, b.len());
}

#[test]
fn test_highlight_identical_has_only_matched_spans() {
    let s = "Le changement climatique affecte la biodiversité mondiale";
    let (m1, m2) = highlight(s, s);

    assert_eq!(m1, m2);
    assert!(!m1.contains("line-through"));
    assert!(!m2.contains("background-color"));
    assert_eq!(m1.matches("<b>").count(), 7);
    assert!(m1.starts_with("<b>Le</b> <b>changement</b>"));
}

#[test]
fn test_highlight_marks_removed_and_added() {
    let (m1, m2) = highlight("le chat noir dort", "le chien noir dort");

    assert_eq!(
        m1,
        "<b>le</b> <span style='color:lightgray; text-decoration: line-through;'>chat</span> \
         <b>noir</b> <b>dort</b>"
    );
    assert_eq!(
        m2,
        "<b>le</b> <i style='background-color: #d4edda;'>chien</i> <b>noir</b> <b>dort</b>"
    );
}

#[test]
fn test_highlight_insert_only_touches_source_side() {
    let style = MarkupStyle {
        matched: ("[", "]"),
        removed: ("-", "-"),
        added: ("+", "+"),
    };
    let (m1, m2) = highlight_with("a b", "a x b", &style);

    assert_eq!(m1, "[a] [b]");
    assert_eq!(m2, "[a] +x+ [b]");
}

#[test]
fn test_highlight_delete_only_touches_suspect_side() {
    let style = MarkupStyle {
        matched: ("[", "]"),
        removed: ("-", "-"),
        added: ("+", "+"),
    };
    let (m1, m2) = highlight_with("a x b", "a b", &style);

    assert_eq!(m1, "[a] -x- [b]");
    assert_eq!(m2, "[a] [b]");
}

#[test]
fn test_highlight_normalizes_whitespace() {
    let style = MarkupStyle {
        matched: ("", ""),
        removed: ("", ""),
        added: ("", ""),
    };
    let (m1, _) = highlight_with("  un   deux\ttrois ", "un deux trois", &style);
    assert_eq!(m1, "un deux trois");
}

#[test]
fn test_highlight_escapes_html() {
    let (m1, _) = highlight("a <script> b", "a <script> b");
    assert!(m1.contains("<b>&lt;script&gt;</b>"));
}

#[test]
fn test_highlight_empty_inputs() {
    assert_eq!(highlight("", ""), (String::new(), String::new()));
}
