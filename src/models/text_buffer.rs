//! 文本缓冲区模型
//!
//! 职责：
//! - 文本存储（Rope）
//! - 选区管理（字符偏移）
//! - 编辑版本号（每次内容变化递增）
//! - 字符偏移 ↔ 行列映射（仅供视图使用）

use super::selection::Selection;
use ropey::{Rope, RopeSlice};
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// 从 RopeSlice 获取字符串，优先零拷贝
pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

#[derive(Clone)]
pub struct TextBuffer {
    rope: Rope,
    selection: Selection,
    version: u64,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            selection: Selection::default(),
            version: 0,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::default(),
            version: 0,
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.len_chars());
    }

    /// 整体替换内容，光标回到开头
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.selection = Selection::caret(0);
        self.version = self.version.wrapping_add(1);
    }

    /// 恢复快照（Undo/Redo）
    pub fn restore(&mut self, rope: Rope, selection: Selection) {
        self.rope = rope;
        self.selection = selection.clamp(self.rope.len_chars());
        self.version = self.version.wrapping_add(1);
    }

    /// 用 `text` 替换 `[start, end)`，返回插入文本末尾的字符偏移
    ///
    /// 越界的偏移会被截断到文本长度；选区不在这里调整，由调用方决定光标策略。
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) -> usize {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);

        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.version = self.version.wrapping_add(1);
        start + text.chars().count()
    }

    pub fn slice(&self, start: usize, end: usize) -> Cow<'_, str> {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        slice_to_cow(self.rope.slice(start..end))
    }

    /// 光标所在行的行首偏移
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_chars());
        self.rope.line_to_char(self.rope.char_to_line(offset))
    }

    /// 行尾偏移（不含换行符）
    pub fn line_end(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_chars());
        let row = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(row);
        let line = slice_to_cow(self.rope.line(row));
        let content = line.trim_end_matches(['\n', '\r']);
        start + content.chars().count()
    }

    /// `offset` 之前最后一个字素簇的起点；行首时退到上一行末尾（吞掉换行）
    pub fn prev_grapheme_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_chars());
        if offset == 0 {
            return 0;
        }
        let line_start = self.line_start(offset);
        if line_start == offset {
            if offset >= 2
                && self.rope.char(offset - 1) == '\n'
                && self.rope.char(offset - 2) == '\r'
            {
                return offset - 2;
            }
            return offset - 1;
        }
        let before = self.slice(line_start, offset);
        let last = before
            .graphemes(true)
            .next_back()
            .map(|g| g.chars().count())
            .unwrap_or(1);
        offset - last
    }

    /// `offset` 之后第一个字素簇的终点
    pub fn next_grapheme_end(&self, offset: usize) -> usize {
        let len = self.rope.len_chars();
        let offset = offset.min(len);
        if offset == len {
            return len;
        }
        let line_end = self.line_end(offset);
        if line_end == offset {
            return offset + 1;
        }
        let after = self.slice(offset, line_end);
        let first = after
            .graphemes(true)
            .next()
            .map(|g| g.chars().count())
            .unwrap_or(1);
        offset + first
    }

    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let row = self.rope.char_to_line(offset);
        let col = offset - self.rope.line_to_char(row);
        (row, col)
    }

    /// 行列 → 偏移，列超过行长时吸附到行尾
    pub fn line_col_to_offset(&self, row: usize, col: usize) -> usize {
        let last_row = self.rope.len_lines().saturating_sub(1);
        let row = row.min(last_row);
        let start = self.rope.line_to_char(row);
        let end = self.line_end(start);
        (start + col).min(end)
    }

    pub fn line(&self, row: usize) -> Option<Cow<'_, str>> {
        if row < self.rope.len_lines() {
            Some(slice_to_cow(self.rope.line(row)))
        } else {
            None
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;
