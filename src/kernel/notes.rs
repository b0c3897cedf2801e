//! Naming rules for notes: listing filter, untitled numbering and rename targets.

use super::services::ports::DirEntry;
use std::path::{Path, PathBuf};

pub const UNTITLED_PREFIX: &str = "Untitled-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    EmptyName,
    InvalidName(String),
    NoParent(PathBuf),
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenameError::EmptyName => write!(f, "Note name cannot be empty"),
            RenameError::InvalidName(name) => write!(f, "Invalid note name: {}", name),
            RenameError::NoParent(p) => write!(f, "No parent directory: {}", p.display()),
        }
    }
}

impl std::error::Error for RenameError {}

pub fn is_note_name(name: &str, extension: &str) -> bool {
    name.len() > extension.len() + 1
        && name
            .strip_suffix(extension)
            .is_some_and(|stem| stem.ends_with('.'))
}

pub fn is_note_path(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
        && path.file_stem().is_some_and(|stem| !stem.is_empty())
}

/// Note file names in enumeration order. Directories are skipped; nothing is sorted.
pub fn filter_notes(entries: &[DirEntry], extension: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.is_file && is_note_name(&entry.name, extension))
        .map(|entry| entry.name.clone())
        .collect()
}

/// Index for the next `Untitled-<N>` note: one past the largest existing index.
///
/// The index is the run of digits right after the prefix; a name with no digits there
/// counts as index 0.
pub fn next_untitled_index<'a, I>(names: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| name.strip_prefix(UNTITLED_PREFIX))
        .map(|rest| {
            let digits: &str = rest
                .find(|c: char| !c.is_ascii_digit())
                .map_or(rest, |end| &rest[..end]);
            digits.parse::<u64>().unwrap_or(0)
        })
        .map(|index| index.saturating_add(1))
        .max()
        .unwrap_or(0)
}

pub fn untitled_name(index: u64, extension: &str) -> String {
    format!("{UNTITLED_PREFIX}{index}.{extension}")
}

pub fn next_untitled_name<'a, I>(names: I, extension: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    untitled_name(next_untitled_index(names), extension)
}

/// Target path for renaming `path` to `<new_name>.<extension>` in the same directory.
///
/// A trailing `.<extension>` typed by the user is not doubled.
pub fn renamed_path(path: &Path, new_name: &str, extension: &str) -> Result<PathBuf, RenameError> {
    let name = new_name.trim();
    let suffix = format!(".{extension}");
    let stem = name.strip_suffix(suffix.as_str()).unwrap_or(name);
    if stem.is_empty() {
        return Err(RenameError::EmptyName);
    }
    if stem.contains(['/', '\\']) || stem == "." || stem == ".." {
        return Err(RenameError::InvalidName(name.to_string()));
    }

    let parent = path
        .parent()
        .ok_or_else(|| RenameError::NoParent(path.to_path_buf()))?;
    Ok(parent.join(format!("{stem}{suffix}")))
}

/// `Untitled-3` for `notes/Untitled-3.md`; used to prefill the rename prompt.
pub fn display_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/notes.rs"]
mod tests;
