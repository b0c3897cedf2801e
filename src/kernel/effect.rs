use super::binding::BindingGeneration;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPurpose {
    /// First read after binding: always applied.
    Load,
    /// Watcher-driven re-read: applied only while the buffer has no unsaved edits.
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchSlot {
    /// The notes directory, for the explorer listing.
    Listing,
    /// The bound note's directory.
    Binding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ReadFile {
        generation: BindingGeneration,
        path: PathBuf,
        purpose: ReadPurpose,
    },
    WriteFile {
        generation: BindingGeneration,
        path: PathBuf,
        content: String,
        version: u64,
    },
    ListNotes {
        dir: PathBuf,
    },
    CreateUntitled {
        dir: PathBuf,
    },
    RenameNote {
        from: PathBuf,
        to: PathBuf,
    },
    DeleteNote {
        path: PathBuf,
    },
    Watch {
        slot: WatchSlot,
        dir: PathBuf,
        generation: BindingGeneration,
    },
    Unwatch {
        slot: WatchSlot,
    },
    FocusEditor,
}

impl Effect {
    /// File-system work that runs off the UI thread. The rest is applied by the frontend
    /// right after dispatch.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Effect::ReadFile { .. }
                | Effect::WriteFile { .. }
                | Effect::ListNotes { .. }
                | Effect::CreateUntitled { .. }
                | Effect::RenameNote { .. }
                | Effect::DeleteNote { .. }
        )
    }
}
