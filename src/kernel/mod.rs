//! Headless note-editing core: the sync engine and everything it drives.
//!
//! The session is a plain state machine. It turns [`Action`]s into [`Effect`]s and never
//! blocks; adapters under `services` perform the effects and feed completions back.

pub mod action;
pub mod automation;
pub mod binding;
pub mod debounce;
pub mod effect;
pub mod notes;
pub mod preview;
pub mod services;
pub mod session;
pub mod surface;

pub use action::{Action, Motion, WatchEventKind, WatchTarget};
pub use automation::{apply_key, EditKey, KeyOutcome};
pub use binding::{BindingGeneration, FileBinding};
pub use debounce::Debouncer;
pub use effect::{Effect, ReadPurpose, WatchSlot};
pub use preview::{MarkdownRenderer, PreviewRenderer};
pub use session::{DebounceClass, DispatchResult, NoteSession, ViewMode};
pub use surface::{CursorPolicy, EditingSurface, EditorSurface};
