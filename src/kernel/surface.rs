//! Editing surface: content, selection and a range-replace primitive.
//!
//! Every offset is a char offset into the buffer text. Nothing here keeps line/column
//! coordinates across edits; callers recompute them from the text when they need them.

use crate::models::{EditHistory, Selection, TextBuffer};

/// Where the selection goes after [`EditingSurface::replace_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPolicy {
    /// Caret immediately after the inserted text.
    CollapseToEnd,
}

pub trait EditingSurface {
    fn buffer(&self) -> &TextBuffer;

    fn value(&self) -> String {
        self.buffer().text()
    }

    /// Replaces the whole buffer; the caret moves to offset 0.
    fn set_value(&mut self, text: &str);

    fn selection(&self) -> Selection {
        self.buffer().selection()
    }

    fn set_selection(&mut self, anchor: usize, head: usize);

    fn replace_range(&mut self, text: &str, start: usize, end: usize, policy: CursorPolicy);

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Default typing: replace the selection with `text`.
    fn insert_text(&mut self, text: &str) {
        let (start, end) = self.selection().range();
        self.replace_range(text, start, end, CursorPolicy::CollapseToEnd);
    }

    /// Default Backspace: drop the selection, or the grapheme before the caret.
    /// Returns false when there was nothing to delete.
    fn delete_backward(&mut self) -> bool {
        let (start, end) = self.selection().range();
        if start != end {
            self.replace_range("", start, end, CursorPolicy::CollapseToEnd);
            return true;
        }
        let prev = self.buffer().prev_grapheme_start(start);
        if prev == start {
            return false;
        }
        self.replace_range("", prev, start, CursorPolicy::CollapseToEnd);
        true
    }

    /// Default Delete: drop the selection, or the grapheme after the caret.
    fn delete_forward(&mut self) -> bool {
        let (start, end) = self.selection().range();
        if start != end {
            self.replace_range("", start, end, CursorPolicy::CollapseToEnd);
            return true;
        }
        let next = self.buffer().next_grapheme_end(start);
        if next == start {
            return false;
        }
        self.replace_range("", start, next, CursorPolicy::CollapseToEnd);
        true
    }
}

/// The in-process editing surface: a [`TextBuffer`] plus undo history and a
/// read-only switch.
pub struct EditorSurface {
    buffer: TextBuffer,
    history: EditHistory,
    enabled: bool,
}

impl EditorSurface {
    /// A fresh surface is the disabled, empty placeholder shown while nothing is bound.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            history: EditHistory::new(),
            enabled: false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn version(&self) -> u64 {
        self.buffer.version()
    }

    pub fn undo(&mut self) -> bool {
        let current = self.buffer.selection();
        let Some((rope, selection)) = self.history.undo(self.buffer.rope(), current) else {
            return false;
        };
        self.buffer.restore(rope, selection);
        true
    }

    pub fn redo(&mut self) -> bool {
        let current = self.buffer.selection();
        let Some((rope, selection)) = self.history.redo(self.buffer.rope(), current) else {
            return false;
        };
        self.buffer.restore(rope, selection);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}

impl Default for EditorSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl EditingSurface for EditorSurface {
    fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    fn set_value(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    fn set_selection(&mut self, anchor: usize, head: usize) {
        self.buffer.set_selection(Selection::new(anchor, head));
    }

    fn replace_range(&mut self, text: &str, start: usize, end: usize, policy: CursorPolicy) {
        self.history
            .record(self.buffer.rope(), self.buffer.selection());
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start = start.min(self.buffer.len_chars());
        let inserted_end = self.buffer.replace_range(start, end, text);
        let selection = match policy {
            CursorPolicy::CollapseToEnd => Selection::caret(inserted_end),
        };
        self.buffer.set_selection(selection);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
