//! 编辑历史：会话内的快照式 Undo/Redo
//!
//! - 每次修改前记录一份 (Rope, Selection) 快照；Rope 克隆是共享结构，代价很小
//! - 新编辑会清空 Redo 栈
//! - 历史只存在于内存中，切换/重新加载文件时清空

use super::selection::Selection;
use ropey::Rope;

/// 默认保留的快照数量
pub const DEFAULT_HISTORY_LIMIT: usize = 512;

#[derive(Clone)]
struct Snapshot {
    rope: Rope,
    selection: Selection,
}

pub struct EditHistory {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// 记录修改前的状态
    pub fn record(&mut self, rope: &Rope, selection: Selection) {
        if self.undo.len() >= self.limit {
            self.undo.remove(0);
        }
        self.undo.push(Snapshot {
            rope: rope.clone(),
            selection,
        });
        self.redo.clear();
    }

    /// Undo：传入当前状态，返回要恢复的状态
    pub fn undo(&mut self, rope: &Rope, selection: Selection) -> Option<(Rope, Selection)> {
        let prev = self.undo.pop()?;
        self.redo.push(Snapshot {
            rope: rope.clone(),
            selection,
        });
        Some((prev.rope, prev.selection))
    }

    /// Redo：传入当前状态，返回要恢复的状态
    pub fn redo(&mut self, rope: &Rope, selection: Selection) -> Option<(Rope, Selection)> {
        let next = self.redo.pop()?;
        self.undo.push(Snapshot {
            rope: rope.clone(),
            selection,
        });
        Some((next.rope, next.selection))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_history.rs"]
mod tests;
