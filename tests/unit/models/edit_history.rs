use super::*;

fn rope(text: &str) -> Rope {
    Rope::from_str(text)
}

#[test]
fn test_undo_then_redo() {
    let mut history = EditHistory::new();
    history.record(&rope("a"), Selection::caret(1));

    let (restored, sel) = history
        .undo(&rope("ab"), Selection::caret(2))
        .expect("undo available");
    assert_eq!(restored.to_string(), "a");
    assert_eq!(sel, Selection::caret(1));

    let (restored, sel) = history
        .redo(&restored, sel)
        .expect("redo available");
    assert_eq!(restored.to_string(), "ab");
    assert_eq!(sel, Selection::caret(2));
}

#[test]
fn test_new_record_clears_redo() {
    let mut history = EditHistory::new();
    history.record(&rope(""), Selection::caret(0));
    history.undo(&rope("x"), Selection::caret(1));
    assert!(history.can_redo());

    history.record(&rope(""), Selection::caret(0));
    assert!(!history.can_redo());
}

#[test]
fn test_limit_drops_oldest_snapshot() {
    let mut history = EditHistory::with_limit(2);
    history.record(&rope("1"), Selection::caret(0));
    history.record(&rope("2"), Selection::caret(0));
    history.record(&rope("3"), Selection::caret(0));

    let (r, _) = history.undo(&rope("4"), Selection::caret(0)).unwrap();
    assert_eq!(r.to_string(), "3");
    let (r, _) = history.undo(&r, Selection::caret(0)).unwrap();
    assert_eq!(r.to_string(), "2");
    assert!(history.undo(&r, Selection::caret(0)).is_none());
}

#[test]
fn test_clear_empties_both_stacks() {
    let mut history = EditHistory::new();
    history.record(&rope("a"), Selection::caret(0));
    history.record(&rope("b"), Selection::caret(0));
    history.undo(&rope("c"), Selection::caret(0));
    history.clear();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}
