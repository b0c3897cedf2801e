use crate::kernel::action::Action;
use crate::kernel::effect::Effect;
use crate::kernel::notes;
use crate::kernel::services::ports::{FileError, FileProvider};

/// How many fresh `Untitled-<N>` names to try when another writer takes the chosen one.
const CREATE_ATTEMPTS: usize = 3;

/// Runs one file-system effect to completion and returns the action reporting it.
/// Effects that are not file-system work return `None`.
pub fn execute_effect(
    provider: &dyn FileProvider,
    effect: Effect,
    note_extension: &str,
) -> Option<Action> {
    match effect {
        Effect::ReadFile {
            generation,
            path,
            purpose,
        } => Some(match provider.read_file(&path) {
            Ok(content) => Action::FileLoaded {
                generation,
                path,
                purpose,
                content,
            },
            Err(e) => Action::FileLoadFailed {
                generation,
                path,
                purpose,
                error: e.to_string(),
            },
        }),
        Effect::WriteFile {
            generation,
            path,
            content,
            version,
        } => Some(match provider.write_file(&path, &content) {
            Ok(()) => Action::FileSaved {
                generation,
                path,
                version,
            },
            Err(e) => Action::FileSaveFailed {
                generation,
                path,
                version,
                error: e.to_string(),
            },
        }),
        Effect::ListNotes { dir } => Some(match provider.read_dir(&dir) {
            Ok(entries) => Action::NotesListed {
                notes: notes::filter_notes(&entries, note_extension),
                dir,
            },
            Err(e) => Action::FsOpFailed {
                op: "list",
                path: dir,
                error: e.to_string(),
            },
        }),
        Effect::CreateUntitled { dir } => Some(create_untitled(provider, dir, note_extension)),
        Effect::RenameNote { from, to } => Some(match provider.rename(&from, &to) {
            Ok(()) => Action::NoteRenamed { from, to },
            Err(e) => Action::FsOpFailed {
                op: "rename",
                path: from,
                error: e.to_string(),
            },
        }),
        Effect::DeleteNote { path } => Some(match provider.delete_file(&path) {
            Ok(()) => Action::NoteDeleted { path },
            Err(e) => Action::FsOpFailed {
                op: "delete",
                path,
                error: e.to_string(),
            },
        }),
        Effect::Watch { .. } | Effect::Unwatch { .. } | Effect::FocusEditor => None,
    }
}

fn create_untitled(
    provider: &dyn FileProvider,
    dir: std::path::PathBuf,
    note_extension: &str,
) -> Action {
    let mut last_error = None;
    for _ in 0..CREATE_ATTEMPTS {
        let entries = match provider.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                return Action::FsOpFailed {
                    op: "create",
                    path: dir,
                    error: e.to_string(),
                }
            }
        };
        let names = notes::filter_notes(&entries, note_extension);
        let name = notes::next_untitled_name(names.iter().map(String::as_str), note_extension);
        let path = dir.join(name);
        match provider.create_new_file(&path) {
            Ok(()) => return Action::NoteCreated { path },
            Err(FileError::AlreadyExists(taken)) => {
                tracing::debug!(path = %taken.display(), "untitled name taken, retrying");
                last_error = Some(FileError::AlreadyExists(taken));
            }
            Err(e) => {
                return Action::FsOpFailed {
                    op: "create",
                    path,
                    error: e.to_string(),
                }
            }
        }
    }
    Action::FsOpFailed {
        op: "create",
        error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no free name".to_string()),
        path: dir,
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/executor.rs"]
mod tests;
