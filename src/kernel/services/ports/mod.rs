//! Service ports: traits + data contracts.

pub mod config;
pub mod file;
pub mod settings;

pub use config::{EditorConfig, DEFAULT_NOTES_DIR, NOTE_EXTENSION};
pub use file::{DirEntry, FileError, FileProvider, Result as FileResult};
pub use settings::{EditorSettings, Settings};
