//! 单行输入提示：重命名、打开文件、删除确认

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Rename(PathBuf),
    OpenPath,
    ConfirmDelete(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Cancelled,
    Submitted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        Self {
            kind,
            input: initial.into(),
        }
    }

    pub fn kind(&self) -> &PromptKind {
        &self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn label(&self) -> String {
        match &self.kind {
            PromptKind::Rename(_) => "Rename to: ".to_string(),
            PromptKind::OpenPath => "Open file: ".to_string(),
            PromptKind::ConfirmDelete(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                format!("Delete {name}? (y/n) ")
            }
        }
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> PromptOutcome {
        use crossterm::event::{KeyCode, KeyModifiers};

        if let PromptKind::ConfirmDelete(_) = self.kind {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => PromptOutcome::Submitted(String::new()),
                _ => PromptOutcome::Cancelled,
            };
        }

        match key.code {
            KeyCode::Esc => PromptOutcome::Cancelled,
            KeyCode::Enter => PromptOutcome::Submitted(self.input.clone()),
            KeyCode::Backspace => {
                self.input.pop();
                PromptOutcome::Pending
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                PromptOutcome::Pending
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(ch);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }
}
