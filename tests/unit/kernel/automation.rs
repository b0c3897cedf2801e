use super::*;
use crate::kernel::surface::EditorSurface;

fn surface(text: &str, anchor: usize, head: usize) -> EditorSurface {
    let mut surface = EditorSurface::new();
    surface.set_enabled(true);
    surface.set_value(text);
    surface.set_selection(anchor, head);
    surface
}

fn caret(surface: &EditorSurface) -> usize {
    let sel = surface.selection();
    assert!(sel.is_empty(), "expected a caret, got {sel:?}");
    sel.head()
}

fn extended_config() -> EditorConfig {
    EditorConfig {
        auto_close_markdown_delimiters: true,
        ..EditorConfig::default()
    }
}

#[test]
fn tab_without_selection_inserts_indent_unit() {
    let mut s = surface("ab", 1, 1);
    let outcome = apply_key(&mut s, EditKey::Tab, &EditorConfig::default());

    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(s.value(), "a    b");
    assert_eq!(caret(&s), 5);
}

#[test]
fn tab_with_selection_indents_every_selected_line() {
    let mut s = surface("one\ntwo\nthree", 1, 5);
    apply_key(&mut s, EditKey::Tab, &EditorConfig::default());

    assert_eq!(s.value(), "    one\n    two\nthree");
    assert_eq!(s.selection().range(), (5, 13));
}

#[test]
fn tab_selection_ending_at_column_zero_skips_that_line() {
    let mut s = surface("one\ntwo\nthree", 0, 4);
    apply_key(&mut s, EditKey::Tab, &EditorConfig::default());

    assert_eq!(s.value(), "    one\ntwo\nthree");
    assert_eq!(s.selection().range(), (0, 8));
}

#[test]
fn tab_keeps_backward_selection_direction() {
    let mut s = surface("one\ntwo", 5, 1);
    apply_key(&mut s, EditKey::Tab, &EditorConfig::default());

    let sel = s.selection();
    assert_eq!(sel.anchor(), 13);
    assert_eq!(sel.head(), 5);
}

#[test]
fn backtab_outdents_selected_lines() {
    let mut s = surface("    one\n  two", 0, 13);
    let outcome = apply_key(&mut s, EditKey::BackTab, &EditorConfig::default());

    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(s.value(), "one\ntwo");
    assert_eq!(s.selection().range(), (0, 7));
}

#[test]
fn backtab_outdents_cursor_line_by_one_unit() {
    let mut s = surface("        x", 9, 9);
    apply_key(&mut s, EditKey::BackTab, &EditorConfig::default());

    assert_eq!(s.value(), "    x");
    assert_eq!(caret(&s), 5);
}

#[test]
fn backtab_without_leading_whitespace_leaves_buffer_untouched() {
    let mut s = surface("x", 1, 1);
    let version = s.version();
    apply_key(&mut s, EditKey::BackTab, &EditorConfig::default());

    assert_eq!(s.value(), "x");
    assert_eq!(s.version(), version);
}

#[test]
fn enter_preserves_indentation() {
    let mut s = surface("    foo", 7, 7);
    let outcome = apply_key(&mut s, EditKey::Enter, &EditorConfig::default());

    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(s.value(), "    foo\n    ");
    assert_eq!(caret(&s), 12);
}

#[test]
fn enter_copies_only_whitespace_before_cursor() {
    let mut s = surface("  ab", 1, 1);
    apply_key(&mut s, EditKey::Enter, &EditorConfig::default());

    assert_eq!(s.value(), " \n  ab");
    assert_eq!(caret(&s), 3);
}

#[test]
fn enter_keeps_tabs_in_indentation() {
    let mut s = surface("\t- item", 7, 7);
    apply_key(&mut s, EditKey::Enter, &EditorConfig::default());

    assert_eq!(s.value(), "\t- item\n\t");
    assert_eq!(caret(&s), 9);
}

#[test]
fn enter_uses_indentation_of_current_line_only() {
    let mut s = surface("    a\nb", 7, 7);
    apply_key(&mut s, EditKey::Enter, &EditorConfig::default());

    assert_eq!(s.value(), "    a\nb\n");
    assert_eq!(caret(&s), 8);
}

#[test]
fn backspace_removes_one_indent_unit() {
    let mut s = surface("        ", 8, 8);
    let outcome = apply_key(&mut s, EditKey::Backspace, &EditorConfig::default());

    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(s.value(), "    ");
    assert_eq!(caret(&s), 4);
}

#[test]
fn backspace_treats_tabs_as_leading_whitespace() {
    let mut s = surface("\t   x", 4, 4);
    let outcome = apply_key(&mut s, EditKey::Backspace, &EditorConfig::default());

    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(s.value(), "x");
    assert_eq!(caret(&s), 0);

    let mut s = surface("a\n\t \t y", 6, 6);
    assert_eq!(
        apply_key(&mut s, EditKey::Backspace, &EditorConfig::default()),
        KeyOutcome::Handled
    );
    assert_eq!(s.value(), "a\ny");
}

#[test]
fn backspace_falls_through_when_not_a_multiple_of_unit() {
    let mut s = surface("   ", 3, 3);
    let outcome = apply_key(&mut s, EditKey::Backspace, &EditorConfig::default());

    assert_eq!(outcome, KeyOutcome::PassThrough);
    assert_eq!(s.value(), "   ");
}

#[test]
fn backspace_falls_through_after_text() {
    let mut s = surface("ab  ", 4, 4);
    assert_eq!(
        apply_key(&mut s, EditKey::Backspace, &EditorConfig::default()),
        KeyOutcome::PassThrough
    );

    let mut s = surface("    ", 0, 0);
    assert_eq!(
        apply_key(&mut s, EditKey::Backspace, &EditorConfig::default()),
        KeyOutcome::PassThrough
    );
}

#[test]
fn backspace_falls_through_with_selection() {
    let mut s = surface("        ", 0, 8);
    assert_eq!(
        apply_key(&mut s, EditKey::Backspace, &EditorConfig::default()),
        KeyOutcome::PassThrough
    );
}

#[test]
fn tab_then_backspace_restores_text_and_cursor() {
    let cases = [("", 0), ("hello", 0), ("    x", 4), ("a\n    b", 2), ("a\n    b", 6)];
    for (text, cursor) in cases {
        let mut s = surface(text, cursor, cursor);
        apply_key(&mut s, EditKey::Tab, &EditorConfig::default());
        let outcome = apply_key(&mut s, EditKey::Backspace, &EditorConfig::default());

        assert_eq!(outcome, KeyOutcome::Handled, "case {text:?}@{cursor}");
        assert_eq!(s.value(), text, "case {text:?}@{cursor}");
        assert_eq!(caret(&s), cursor, "case {text:?}@{cursor}");
    }
}

#[test]
fn opening_delimiter_inserts_pair_at_every_position() {
    let text = "abc";
    let config = extended_config();
    for open in ['(', '[', '{', '`', '$', '*', '_'] {
        let close = closing_delimiter(open, true).expect("supported delimiter");
        for p in 0..=text.len() {
            let mut s = surface(text, p, p);
            let outcome = apply_key(&mut s, EditKey::Char(open), &config);

            let expected = format!("{}{open}{close}{}", &text[..p], &text[p..]);
            assert_eq!(outcome, KeyOutcome::Handled);
            assert_eq!(s.value(), expected);
            assert_eq!(caret(&s), p + 1);
        }
    }
}

#[test]
fn opening_delimiter_does_not_type_through_existing_closer() {
    let mut s = surface("()", 1, 1);
    apply_key(&mut s, EditKey::Char('('), &EditorConfig::default());

    assert_eq!(s.value(), "(())");
    assert_eq!(caret(&s), 2);
}

#[test]
fn opening_delimiter_with_selection_falls_through() {
    let mut s = surface("abc", 0, 2);
    let outcome = apply_key(&mut s, EditKey::Char('('), &EditorConfig::default());

    assert_eq!(outcome, KeyOutcome::PassThrough);
    assert_eq!(s.value(), "abc");
}

#[test]
fn markdown_delimiters_only_pair_when_enabled() {
    let mut s = surface("", 0, 0);
    let outcome = apply_key(&mut s, EditKey::Char('*'), &EditorConfig::default());
    assert_eq!(outcome, KeyOutcome::PassThrough);
    assert_eq!(s.value(), "");

    let outcome = apply_key(&mut s, EditKey::Char('*'), &extended_config());
    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(s.value(), "**");
}

#[test]
fn plain_characters_fall_through() {
    let mut s = surface("", 0, 0);
    assert_eq!(
        apply_key(&mut s, EditKey::Char('a'), &extended_config()),
        KeyOutcome::PassThrough
    );
    assert_eq!(closing_delimiter(')', true), None);
}

#[test]
fn custom_indent_width_is_respected() {
    let config = EditorConfig {
        indent_width: 2,
        ..EditorConfig::default()
    };
    let mut s = surface("x", 0, 0);
    apply_key(&mut s, EditKey::Tab, &config);
    assert_eq!(s.value(), "  x");
    apply_key(&mut s, EditKey::Backspace, &config);
    assert_eq!(s.value(), "x");
}
