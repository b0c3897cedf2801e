//! 选区模型：以字符偏移表示的 anchor/head
//!
//! anchor 是选区起点（拖选开始处），head 是光标所在位置。
//! 两者可以任意先后，`range()` 总是返回有序区间。

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    anchor: usize,
    head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// 空选区（仅光标）
    pub fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    pub fn start(&self) -> usize {
        self.range().0
    }

    pub fn end(&self) -> usize {
        self.range().1
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn contains(&self, pos: usize) -> bool {
        let (start, end) = self.range();
        start <= pos && pos < end
    }

    /// 把两端都限制在 `[0, len]` 内
    pub fn clamp(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            head: self.head.min(len),
        }
    }

    /// 移动 head，保留 anchor（Shift + 方向键）
    pub fn extend_to(self, head: usize) -> Self {
        Self {
            anchor: self.anchor,
            head,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/selection.rs"]
mod tests;
