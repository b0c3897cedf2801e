use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_NOTES_DIR: &str = "notes";
pub const NOTE_EXTENSION: &str = "md";

#[derive(Clone, Debug)]
pub struct EditorConfig {
    pub indent_width: usize,
    pub render_debounce_ms: u64,
    pub create_debounce_ms: u64,
    pub watcher_poll_ms: u64,
    pub notes_dir: PathBuf,
    pub note_extension: String,
    /// Also pair `` ` ``, `$`, `*` and `_`, not just brackets.
    pub auto_close_markdown_delimiters: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            render_debounce_ms: 300,
            create_debounce_ms: 100,
            watcher_poll_ms: 250,
            notes_dir: PathBuf::from(DEFAULT_NOTES_DIR),
            note_extension: NOTE_EXTENSION.to_string(),
            auto_close_markdown_delimiters: false,
        }
    }
}

impl EditorConfig {
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width.max(1))
    }

    pub fn render_debounce(&self) -> Duration {
        Duration::from_millis(self.render_debounce_ms)
    }

    pub fn create_debounce(&self) -> Duration {
        Duration::from_millis(self.create_debounce_ms)
    }

    pub fn watcher_poll_interval(&self) -> Duration {
        Duration::from_millis(self.watcher_poll_ms)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
