use super::config::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User settings file. Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, alias = "notesDir", skip_serializing_if = "Option::is_none")]
    pub notes_dir: Option<PathBuf>,
    #[serde(default)]
    pub editor: EditorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_indent_width", alias = "indentWidth")]
    pub indent_width: usize,
    #[serde(default, alias = "autoCloseMarkdownDelimiters")]
    pub auto_close_markdown_delimiters: bool,
    #[serde(default, alias = "renderDebounceMs", skip_serializing_if = "Option::is_none")]
    pub render_debounce_ms: Option<u64>,
}

fn default_indent_width() -> usize {
    4
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            auto_close_markdown_delimiters: false,
            render_debounce_ms: None,
        }
    }
}

impl Settings {
    pub fn apply_to(&self, config: &mut EditorConfig) {
        if let Some(dir) = &self.notes_dir {
            config.notes_dir = dir.clone();
        }
        if self.editor.indent_width > 0 {
            config.indent_width = self.editor.indent_width;
        }
        config.auto_close_markdown_delimiters = self.editor.auto_close_markdown_delimiters;
        if let Some(ms) = self.editor.render_debounce_ms {
            config.render_debounce_ms = ms;
        }
    }

    pub fn to_config(&self) -> EditorConfig {
        let mut config = EditorConfig::default();
        self.apply_to(&mut config);
        config
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
