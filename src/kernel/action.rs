use super::automation::EditKey;
use super::binding::BindingGeneration;
use super::effect::{ReadPurpose, WatchSlot};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocStart,
    DocEnd,
}

/// Which watcher an event came from. Binding events remember the generation the watcher
/// was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchTarget {
    Listing,
    Binding(BindingGeneration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    Rename,
    Change,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Key(EditKey),
    DeleteForward,
    Move { motion: Motion, extend: bool },
    SetSelection { anchor: usize, head: usize },
    Undo,
    Redo,
    SelectNote(PathBuf),
    /// A path picked in the open-file dialog.
    OpenPath(PathBuf),
    CreateUntitled,
    RenameNote { path: PathBuf, new_name: String },
    DeleteNote(PathBuf),
    RefreshListing,
    ToggleView,
    Tick,

    FileLoaded {
        generation: BindingGeneration,
        path: PathBuf,
        purpose: ReadPurpose,
        content: String,
    },
    FileLoadFailed {
        generation: BindingGeneration,
        path: PathBuf,
        purpose: ReadPurpose,
        error: String,
    },
    FileSaved {
        generation: BindingGeneration,
        path: PathBuf,
        version: u64,
    },
    FileSaveFailed {
        generation: BindingGeneration,
        path: PathBuf,
        version: u64,
        error: String,
    },
    NotesListed {
        dir: PathBuf,
        notes: Vec<String>,
    },
    NoteCreated {
        path: PathBuf,
    },
    NoteRenamed {
        from: PathBuf,
        to: PathBuf,
    },
    NoteDeleted {
        path: PathBuf,
    },
    FsOpFailed {
        op: &'static str,
        path: PathBuf,
        error: String,
    },
    WatchEvent {
        target: WatchTarget,
        kind: WatchEventKind,
        filename: String,
    },
    WatchFailed {
        slot: WatchSlot,
        error: String,
    },
}

impl Action {
    /// Actions that come straight from the user (as opposed to I/O completions).
    pub fn is_user_intent(&self) -> bool {
        matches!(
            self,
            Action::Key(_)
                | Action::DeleteForward
                | Action::Undo
                | Action::Redo
                | Action::SelectNote(_)
                | Action::OpenPath(_)
                | Action::CreateUntitled
                | Action::RenameNote { .. }
                | Action::DeleteNote(_)
                | Action::RefreshListing
                | Action::ToggleView
        )
    }
}
