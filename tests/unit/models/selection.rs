use super::*;

#[test]
fn test_selection_range_is_ordered() {
    let sel = Selection::new(7, 2);
    assert_eq!(sel.range(), (2, 7));
    assert_eq!(sel.start(), 2);
    assert_eq!(sel.end(), 7);
    assert_eq!(sel.head(), 2);
    assert_eq!(sel.anchor(), 7);
}

#[test]
fn test_caret_is_empty() {
    let sel = Selection::caret(3);
    assert!(sel.is_empty());
    assert_eq!(sel.range(), (3, 3));
    assert!(!sel.contains(3));
}

#[test]
fn test_contains_is_half_open() {
    let sel = Selection::new(1, 4);
    assert!(sel.contains(1));
    assert!(sel.contains(3));
    assert!(!sel.contains(4));
}

#[test]
fn test_clamp_limits_both_ends() {
    let sel = Selection::new(10, 20).clamp(5);
    assert_eq!(sel.range(), (5, 5));
}

#[test]
fn test_extend_to_keeps_anchor() {
    let sel = Selection::caret(4).extend_to(1);
    assert_eq!(sel.anchor(), 4);
    assert_eq!(sel.head(), 1);
    assert_eq!(sel.range(), (1, 4));
}
