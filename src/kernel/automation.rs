//! Structural key handling: Tab, Shift+Tab, Enter, Backspace and opening delimiters.
//!
//! Each handler reads the buffer and selection, computes one replacement and applies it
//! through the [`EditingSurface`]. Keys that are not intercepted come back as
//! [`KeyOutcome::PassThrough`] so the caller can run the surface's default behavior.

use super::services::ports::EditorConfig;
use super::surface::{CursorPolicy, EditingSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Tab,
    BackTab,
    Enter,
    Backspace,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The buffer was rewritten; native handling must be suppressed.
    Handled,
    PassThrough,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        matches!(self, KeyOutcome::Handled)
    }
}

/// Closing partner for an opening delimiter. The markdown emphasis/code/math
/// delimiters only pair up when `extended` is set.
pub fn closing_delimiter(open: char, extended: bool) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '`' | '$' | '*' | '_' if extended => Some(open),
        _ => None,
    }
}

pub fn apply_key<S>(surface: &mut S, key: EditKey, config: &EditorConfig) -> KeyOutcome
where
    S: EditingSurface + ?Sized,
{
    let width = config.indent_width.max(1);
    match key {
        EditKey::Tab => {
            indent(surface, &config.indent_unit());
            KeyOutcome::Handled
        }
        EditKey::BackTab => {
            outdent(surface, width);
            KeyOutcome::Handled
        }
        EditKey::Enter => {
            newline_with_indent(surface);
            KeyOutcome::Handled
        }
        EditKey::Backspace => backspace_indent(surface, width),
        EditKey::Char(ch) => auto_close(surface, ch, config.auto_close_markdown_delimiters),
    }
}

fn indent<S: EditingSurface + ?Sized>(surface: &mut S, unit: &str) {
    let width = unit.chars().count();
    let selection = surface.selection();
    if selection.is_empty() {
        let at = selection.head();
        surface.replace_range(unit, at, at, CursorPolicy::CollapseToEnd);
        return;
    }

    let (start, end) = selection.range();
    let (block_start, block_end) = line_block(surface, start, end);
    let block = surface.buffer().slice(block_start, block_end).into_owned();

    let mut out = String::with_capacity(block.len() + width * 4);
    let mut lines = 0usize;
    for line in block.split_inclusive('\n') {
        out.push_str(unit);
        out.push_str(line);
        lines += 1;
    }

    surface.replace_range(&out, block_start, block_end, CursorPolicy::CollapseToEnd);

    // A selection starting at column 0 keeps covering the whole first line.
    let new_start = if start > block_start { start + width } else { start };
    let new_end = end + width * lines;
    restore_direction(surface, selection.anchor() <= selection.head(), new_start, new_end);
}

fn outdent<S: EditingSurface + ?Sized>(surface: &mut S, width: usize) {
    let selection = surface.selection();
    let (start, end) = selection.range();
    let (block_start, block_end) = line_block(surface, start, end);
    let block = surface.buffer().slice(block_start, block_end).into_owned();

    // (line start offset within the buffer, chars removed from that line)
    let mut removals: Vec<(usize, usize)> = Vec::new();
    let mut out = String::with_capacity(block.len());
    let mut line_start = block_start;
    for line in block.split_inclusive('\n') {
        let removed = outdent_len(line, width);
        removals.push((line_start, removed));
        out.extend(line.chars().skip(removed));
        line_start += line.chars().count();
    }

    if removals.iter().all(|(_, removed)| *removed == 0) {
        return;
    }

    surface.replace_range(&out, block_start, block_end, CursorPolicy::CollapseToEnd);

    let map = |pos: usize| -> usize {
        let mut shift = 0usize;
        for &(line_start, removed) in &removals {
            if pos >= line_start + removed {
                shift += removed;
            } else if pos > line_start {
                shift += pos - line_start;
            }
        }
        pos - shift
    };
    restore_direction(
        surface,
        selection.anchor() <= selection.head(),
        map(start),
        map(end),
    );
}

/// Leading chars to strip: up to one indent unit of spaces, or a single tab.
fn outdent_len(line: &str, width: usize) -> usize {
    if line.starts_with('\t') {
        return 1;
    }
    line.chars().take(width).take_while(|c| *c == ' ').count()
}

fn newline_with_indent<S: EditingSurface + ?Sized>(surface: &mut S) {
    let (start, end) = surface.selection().range();
    let buffer = surface.buffer();
    let line_start = buffer.line_start(start);
    let indent: String = buffer
        .slice(line_start, start)
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    let mut text = String::with_capacity(indent.len() + 1);
    text.push('\n');
    text.push_str(&indent);
    surface.replace_range(&text, start, end, CursorPolicy::CollapseToEnd);
}

fn backspace_indent<S: EditingSurface + ?Sized>(surface: &mut S, width: usize) -> KeyOutcome {
    let selection = surface.selection();
    if !selection.is_empty() {
        return KeyOutcome::PassThrough;
    }

    let cursor = selection.head();
    let line_start = surface.buffer().line_start(cursor);
    let prefix_len = cursor - line_start;
    if prefix_len == 0 || prefix_len % width != 0 {
        return KeyOutcome::PassThrough;
    }
    let blank = surface
        .buffer()
        .slice(line_start, cursor)
        .chars()
        .all(|c| c.is_whitespace() && c != '\n' && c != '\r');
    if !blank {
        return KeyOutcome::PassThrough;
    }

    surface.replace_range("", cursor - width, cursor, CursorPolicy::CollapseToEnd);
    KeyOutcome::Handled
}

fn auto_close<S: EditingSurface + ?Sized>(surface: &mut S, ch: char, extended: bool) -> KeyOutcome {
    let Some(close) = closing_delimiter(ch, extended) else {
        return KeyOutcome::PassThrough;
    };
    let selection = surface.selection();
    if !selection.is_empty() {
        return KeyOutcome::PassThrough;
    }

    let at = selection.head();
    let mut pair = String::with_capacity(2);
    pair.push(ch);
    pair.push(close);
    surface.replace_range(&pair, at, at, CursorPolicy::CollapseToEnd);
    surface.set_selection(at + 1, at + 1);
    KeyOutcome::Handled
}

/// Char range covering every line touched by `[start, end)`. A non-empty selection that
/// ends at column 0 does not include that last line.
fn line_block<S: EditingSurface + ?Sized>(surface: &S, start: usize, end: usize) -> (usize, usize) {
    let buffer = surface.buffer();
    let block_start = buffer.line_start(start);
    let last = if end > start && buffer.line_start(end) == end {
        end - 1
    } else {
        end
    };
    let block_end = buffer.line_end(last.max(start));
    (block_start, block_end)
}

fn restore_direction<S: EditingSurface + ?Sized>(
    surface: &mut S,
    forward: bool,
    start: usize,
    end: usize,
) {
    if forward {
        surface.set_selection(start, end);
    } else {
        surface.set_selection(end, start);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/automation.rs"]
mod tests;
