//! The editor–storage sync engine.
//!
//! [`NoteSession`] is the single owner of the buffer, the file binding, the debounce timers
//! and the rendered preview. It never performs I/O: handlers return [`Effect`]s, and the
//! results come back later as completion [`Action`]s that are re-checked against the
//! binding that is current *at completion time*.

use super::action::{Action, Motion, WatchEventKind, WatchTarget};
use super::automation::{self, EditKey};
use super::binding::{BindingGeneration, FileBinding};
use super::debounce::Debouncer;
use super::effect::{Effect, ReadPurpose, WatchSlot};
use super::notes;
use super::preview::{MarkdownRenderer, PreviewRenderer};
use super::services::ports::EditorConfig;
use super::surface::{EditingSurface, EditorSurface};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed: true,
        }
    }

    fn effects_only(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebounceClass {
    /// Re-render the preview, then write the buffer to the bound file.
    RenderAndPersist,
    /// Re-render only (after a reload from disk).
    Render,
    CreateUntitled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DebouncedJob {
    RenderAndPersist,
    Render,
    CreateUntitled { dir: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Edit,
    Preview,
}

pub struct NoteSession {
    config: EditorConfig,
    surface: EditorSurface,
    renderer: Box<dyn PreviewRenderer>,
    binding: Option<FileBinding>,
    last_generation: BindingGeneration,
    /// Buffer version whose content was last loaded from or handed to a write on disk.
    /// `None` while the disk copy is known to be behind the buffer.
    persisted_version: Option<u64>,
    debouncer: Debouncer<DebounceClass, DebouncedJob>,
    preview_html: String,
    view_mode: ViewMode,
    notes: Vec<String>,
    notice: Option<String>,
}

impl NoteSession {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_renderer(config, Box::new(MarkdownRenderer))
    }

    pub fn with_renderer(config: EditorConfig, renderer: Box<dyn PreviewRenderer>) -> Self {
        Self {
            config,
            surface: EditorSurface::new(),
            renderer,
            binding: None,
            last_generation: BindingGeneration::default(),
            persisted_version: None,
            debouncer: Debouncer::new(),
            preview_html: String::new(),
            view_mode: ViewMode::Edit,
            notes: Vec::new(),
            notice: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &EditorSurface {
        &self.surface
    }

    pub fn binding(&self) -> Option<&FileBinding> {
        self.binding.as_ref()
    }

    pub fn bound_path(&self) -> Option<&Path> {
        self.binding.as_ref().map(FileBinding::path)
    }

    pub fn preview_html(&self) -> &str {
        &self.preview_html
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_pending(&self, class: DebounceClass) -> bool {
        self.debouncer.is_pending(class)
    }

    /// When the owner must tick next, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.binding.is_some()
            && (self.debouncer.is_pending(DebounceClass::RenderAndPersist)
                || self.persisted_version != Some(self.surface.version()))
    }

    /// Initial effects: watch the notes directory and list it.
    pub fn startup(&mut self) -> DispatchResult {
        let dir = self.config.notes_dir.clone();
        self.preview_html = self.renderer.render("");
        tracing::info!(notes_dir = %dir.display(), "session started");
        DispatchResult::changed(vec![
            Effect::Watch {
                slot: WatchSlot::Listing,
                dir: dir.clone(),
                generation: BindingGeneration::default(),
            },
            Effect::ListNotes { dir },
        ])
    }

    /// Final flush before the process exits: the pending save (if any) is written now and
    /// every other timer is dropped. A save that is waiting on an in-flight rename is lost.
    pub fn shutdown(&mut self) -> DispatchResult {
        self.debouncer.cancel(DebounceClass::Render);
        self.debouncer.cancel(DebounceClass::CreateUntitled);
        if let Some(target) = self.binding.as_ref().and_then(|b| b.renaming_to()) {
            tracing::warn!(target = %target.display(), "exiting during rename; unsaved edits dropped");
            self.debouncer.cancel(DebounceClass::RenderAndPersist);
            return DispatchResult::unchanged();
        }
        let effects: Vec<Effect> = self.flush_pending_save().into_iter().collect();
        DispatchResult::effects_only(effects)
    }

    pub fn dispatch(&mut self, action: Action, now: Instant) -> DispatchResult {
        let _note = tracing::info_span!("note", path = ?self.bound_path()).entered();
        let notice_cleared = action.is_user_intent() && self.notice.take().is_some();

        let mut result = match action {
            Action::Key(key) => self.handle_key(key, now),
            Action::DeleteForward => self.edit(now, |surface| {
                surface.delete_forward();
            }),
            Action::Undo => self.edit(now, |surface| {
                surface.undo();
            }),
            Action::Redo => self.edit(now, |surface| {
                surface.redo();
            }),
            Action::Move { motion, extend } => self.move_cursor(motion, extend),
            Action::SetSelection { anchor, head } => {
                if self.view_mode != ViewMode::Edit {
                    return DispatchResult::unchanged();
                }
                self.surface.set_selection(anchor, head);
                DispatchResult::changed(Vec::new())
            }
            Action::SelectNote(path) => DispatchResult::changed(self.bind(path)),
            Action::OpenPath(path) => self.open_path(path),
            Action::CreateUntitled => {
                let dir = self.config.notes_dir.clone();
                self.debouncer.schedule(
                    DebounceClass::CreateUntitled,
                    DebouncedJob::CreateUntitled { dir },
                    self.config.create_debounce(),
                    now,
                );
                DispatchResult::unchanged()
            }
            Action::RenameNote { path, new_name } => self.rename(path, &new_name),
            Action::DeleteNote(path) => self.delete(path),
            Action::RefreshListing => DispatchResult::effects_only(vec![self.list_notes()]),
            Action::ToggleView => self.toggle_view(),
            Action::Tick => self.fire_due(now),

            Action::FileLoaded {
                generation,
                path,
                purpose,
                content,
            } => self.file_loaded(generation, &path, purpose, content, now),
            Action::FileLoadFailed {
                generation,
                path,
                purpose,
                error,
            } => self.file_load_failed(generation, &path, purpose, &error),
            Action::FileSaved {
                generation,
                path,
                version,
            } => {
                tracing::debug!(
                    path = %path.display(),
                    generation = generation.raw(),
                    version,
                    "note saved"
                );
                DispatchResult::unchanged()
            }
            Action::FileSaveFailed {
                generation,
                path,
                version,
                error,
            } => self.file_save_failed(generation, &path, version, &error),
            Action::NotesListed { dir, notes } => {
                if dir != self.config.notes_dir {
                    return DispatchResult::unchanged();
                }
                let changed = self.notes != notes;
                self.notes = notes;
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: changed,
                }
            }
            Action::NoteCreated { path } => {
                tracing::info!(path = %path.display(), "note created");
                let mut effects = vec![self.list_notes()];
                effects.extend(self.bind(path));
                DispatchResult::changed(effects)
            }
            Action::NoteRenamed { from, to } => self.renamed(from, to),
            Action::NoteDeleted { path } => {
                tracing::info!(path = %path.display(), "note deleted");
                DispatchResult::effects_only(vec![self.list_notes()])
            }
            Action::FsOpFailed { op, path, error } => self.fs_op_failed(op, &path, &error),
            Action::WatchEvent {
                target,
                kind,
                filename,
            } => self.watch_event(target, kind, &filename),
            Action::WatchFailed { slot, error } => {
                tracing::warn!(?slot, error = %error, "watcher setup failed");
                if slot == WatchSlot::Binding {
                    if let Some(binding) = self.binding.as_mut() {
                        binding.clear_watch();
                    }
                }
                DispatchResult::unchanged()
            }
        };

        result.state_changed |= notice_cleared;
        result
    }

    // ---- editing ---------------------------------------------------------------------

    fn accepts_input(&self) -> bool {
        self.view_mode == ViewMode::Edit && self.surface.is_enabled()
    }

    fn handle_key(&mut self, key: EditKey, now: Instant) -> DispatchResult {
        let config = self.config.clone();
        self.edit(now, move |surface| {
            let outcome = automation::apply_key(surface, key, &config);
            if outcome.is_handled() {
                return;
            }
            match key {
                EditKey::Char(ch) => {
                    let mut buf = [0u8; 4];
                    surface.insert_text(ch.encode_utf8(&mut buf));
                }
                EditKey::Backspace => {
                    surface.delete_backward();
                }
                EditKey::Tab | EditKey::BackTab | EditKey::Enter => {}
            }
        })
    }

    /// Runs `f` against the surface and, if the text changed, raises the content-changed
    /// signal shared by every kind of edit.
    fn edit<F>(&mut self, now: Instant, f: F) -> DispatchResult
    where
        F: FnOnce(&mut EditorSurface),
    {
        if !self.accepts_input() {
            return DispatchResult::unchanged();
        }
        let before = self.surface.version();
        f(&mut self.surface);
        if self.surface.version() != before {
            self.content_changed(now);
        }
        DispatchResult::changed(Vec::new())
    }

    fn content_changed(&mut self, now: Instant) {
        self.debouncer.schedule(
            DebounceClass::RenderAndPersist,
            DebouncedJob::RenderAndPersist,
            self.config.render_debounce(),
            now,
        );
        // the persist job renders too
        self.debouncer.cancel(DebounceClass::Render);
    }

    fn move_cursor(&mut self, motion: Motion, extend: bool) -> DispatchResult {
        if self.view_mode != ViewMode::Edit {
            return DispatchResult::unchanged();
        }
        let buffer = self.surface.buffer();
        let selection = buffer.selection();
        let head = selection.head();
        let collapse_only = !extend && !selection.is_empty();

        let target = match motion {
            Motion::Left if collapse_only => selection.start(),
            Motion::Right if collapse_only => selection.end(),
            Motion::Left => buffer.prev_grapheme_start(head),
            Motion::Right => buffer.next_grapheme_end(head),
            Motion::Up => {
                let (row, col) = buffer.offset_to_line_col(head);
                if row == 0 {
                    0
                } else {
                    buffer.line_col_to_offset(row - 1, col)
                }
            }
            Motion::Down => {
                let (row, col) = buffer.offset_to_line_col(head);
                if row + 1 >= buffer.len_lines() {
                    buffer.len_chars()
                } else {
                    buffer.line_col_to_offset(row + 1, col)
                }
            }
            Motion::LineStart => buffer.line_start(head),
            Motion::LineEnd => buffer.line_end(head),
            Motion::DocStart => 0,
            Motion::DocEnd => buffer.len_chars(),
        };

        let anchor = if extend { selection.anchor() } else { target };
        self.surface.set_selection(anchor, target);
        DispatchResult::changed(Vec::new())
    }

    // ---- debounced jobs --------------------------------------------------------------

    fn fire_due(&mut self, now: Instant) -> DispatchResult {
        let due = self.debouncer.poll(now);
        if due.is_empty() {
            return DispatchResult::unchanged();
        }

        let mut effects = Vec::new();
        let mut changed = false;
        for (_, job) in due {
            match job {
                DebouncedJob::RenderAndPersist => {
                    changed = true;
                    effects.extend(self.render_and_persist(now));
                }
                DebouncedJob::Render => {
                    changed = true;
                    self.render_preview();
                }
                DebouncedJob::CreateUntitled { dir } => {
                    effects.push(Effect::CreateUntitled { dir });
                }
            }
        }

        DispatchResult {
            effects,
            state_changed: changed,
        }
    }

    fn render_preview(&mut self) {
        let text = self.surface.value();
        self.preview_html = self.renderer.render(&text);
    }

    /// Render first so the preview is never behind what gets written.
    fn render_and_persist(&mut self, now: Instant) -> Option<Effect> {
        let text = self.surface.value();
        self.preview_html = self.renderer.render(&text);

        let binding = self.binding.as_ref()?;
        if !binding.is_loaded() {
            return None;
        }
        if binding.renaming_to().is_some() {
            // the file is moving; write once the rename settles
            self.debouncer.schedule(
                DebounceClass::RenderAndPersist,
                DebouncedJob::RenderAndPersist,
                self.config.render_debounce(),
                now,
            );
            return None;
        }

        let version = self.surface.version();
        self.persisted_version = Some(version);
        Some(Effect::WriteFile {
            generation: binding.generation(),
            path: binding.path().to_path_buf(),
            content: text,
            version,
        })
    }

    /// Cancels a pending save and, if the buffer is bound, returns the write it would have
    /// performed so it lands before the binding is abandoned.
    fn flush_pending_save(&mut self) -> Option<Effect> {
        self.debouncer.cancel(DebounceClass::RenderAndPersist)?;
        let binding = self.binding.as_ref()?;
        if !binding.is_loaded() {
            return None;
        }
        let version = self.surface.version();
        self.persisted_version = Some(version);
        tracing::debug!(path = %binding.path().display(), version, "flushing pending save");
        Some(Effect::WriteFile {
            generation: binding.generation(),
            path: binding.path().to_path_buf(),
            content: self.surface.value(),
            version,
        })
    }

    // ---- binding ---------------------------------------------------------------------

    fn next_generation(&mut self) -> BindingGeneration {
        self.last_generation = self.last_generation.next();
        self.last_generation
    }

    /// Switches the buffer to `path`: flush, tear down the old watch, watch the new
    /// directory, read the note. The surface stays disabled until the read lands.
    fn bind(&mut self, path: PathBuf) -> Vec<Effect> {
        let mut effects = Vec::new();
        effects.extend(self.flush_pending_save());
        self.debouncer.cancel(DebounceClass::Render);

        if self.binding.take().is_some() {
            effects.push(Effect::Unwatch {
                slot: WatchSlot::Binding,
            });
        }

        let generation = self.next_generation();
        let mut binding = FileBinding::new(path.clone(), generation);
        let dir = binding.start_watch();
        self.surface.set_enabled(false);
        self.persisted_version = None;

        tracing::info!(
            path = %path.display(),
            generation = generation.raw(),
            "binding note"
        );

        effects.push(Effect::Watch {
            slot: WatchSlot::Binding,
            dir,
            generation,
        });
        effects.push(Effect::ReadFile {
            generation,
            path,
            purpose: ReadPurpose::Load,
        });
        self.binding = Some(binding);
        effects
    }

    fn unbind(&mut self) -> Vec<Effect> {
        self.debouncer.cancel(DebounceClass::RenderAndPersist);
        self.debouncer.cancel(DebounceClass::Render);
        self.persisted_version = None;
        self.surface.set_value("");
        self.surface.clear_history();
        self.surface.set_enabled(false);
        self.preview_html = self.renderer.render("");

        match self.binding.take() {
            Some(binding) => {
                tracing::info!(path = %binding.path().display(), "note unbound");
                vec![Effect::Unwatch {
                    slot: WatchSlot::Binding,
                }]
            }
            None => Vec::new(),
        }
    }

    fn open_path(&mut self, path: PathBuf) -> DispatchResult {
        if !notes::is_note_path(&path, &self.config.note_extension) {
            tracing::warn!(path = %path.display(), "rejected non-note file");
            self.notice = Some(format!(
                "Only .{} files can be opened: {}",
                self.config.note_extension,
                path.display()
            ));
            return DispatchResult::changed(Vec::new());
        }
        DispatchResult::changed(self.bind(path))
    }

    fn file_loaded(
        &mut self,
        generation: BindingGeneration,
        path: &Path,
        purpose: ReadPurpose,
        content: String,
        now: Instant,
    ) -> DispatchResult {
        let Some(binding) = self.binding.as_mut() else {
            tracing::debug!(path = %path.display(), "dropping read for unbound session");
            return DispatchResult::unchanged();
        };
        if !binding.matches(generation, path) {
            tracing::debug!(
                path = %path.display(),
                generation = generation.raw(),
                current = binding.generation().raw(),
                "dropping stale read"
            );
            return DispatchResult::unchanged();
        }

        match purpose {
            ReadPurpose::Load => {
                binding.mark_loaded();
                self.surface.set_value(&content);
                self.surface.clear_history();
                self.surface.set_enabled(self.view_mode == ViewMode::Edit);
                self.persisted_version = Some(self.surface.version());
                self.debouncer.cancel(DebounceClass::Render);
                self.preview_html = self.renderer.render(&content);
                tracing::info!(path = %path.display(), "note loaded");
                DispatchResult::changed(Vec::new())
            }
            ReadPurpose::Reload => {
                let dirty = self.debouncer.is_pending(DebounceClass::RenderAndPersist)
                    || self.persisted_version != Some(self.surface.version());
                if dirty {
                    tracing::debug!(path = %path.display(), "reload skipped: unsaved edits");
                    return DispatchResult::unchanged();
                }
                if *self.surface.buffer().rope() == content.as_str() {
                    return DispatchResult::unchanged();
                }

                let selection = self.surface.selection();
                self.surface.set_value(&content);
                self.surface.set_selection(selection.anchor(), selection.head());
                self.surface.clear_history();
                self.persisted_version = Some(self.surface.version());
                self.debouncer.schedule(
                    DebounceClass::Render,
                    DebouncedJob::Render,
                    self.config.render_debounce(),
                    now,
                );
                tracing::info!(path = %path.display(), "note reloaded from disk");
                DispatchResult::changed(Vec::new())
            }
        }
    }

    fn file_load_failed(
        &mut self,
        generation: BindingGeneration,
        path: &Path,
        purpose: ReadPurpose,
        error: &str,
    ) -> DispatchResult {
        let Some(binding) = self.binding.as_mut() else {
            return DispatchResult::unchanged();
        };
        if !binding.matches(generation, path) {
            tracing::debug!(path = %path.display(), "dropping stale read failure");
            return DispatchResult::unchanged();
        }

        binding.mark_read_failed();
        self.surface.set_enabled(false);
        tracing::error!(path = %path.display(), ?purpose, error = %error, "read failed");
        self.notice = Some(format!("Could not read {}: {}", path.display(), error));
        DispatchResult::changed(Vec::new())
    }

    fn file_save_failed(
        &mut self,
        generation: BindingGeneration,
        path: &Path,
        version: u64,
        error: &str,
    ) -> DispatchResult {
        tracing::error!(path = %path.display(), version, error = %error, "write failed");
        let current = self
            .binding
            .as_ref()
            .is_some_and(|binding| binding.matches(generation, path));
        if current && self.persisted_version == Some(version) {
            // disk is behind; the buffer stays authoritative until the next edit saves it
            self.persisted_version = None;
        }
        self.notice = Some(format!("Could not save {}: {}", path.display(), error));
        DispatchResult::changed(Vec::new())
    }

    // ---- explorer operations ---------------------------------------------------------

    fn list_notes(&self) -> Effect {
        Effect::ListNotes {
            dir: self.config.notes_dir.clone(),
        }
    }

    fn rename(&mut self, path: PathBuf, new_name: &str) -> DispatchResult {
        let to = match notes::renamed_path(&path, new_name, &self.config.note_extension) {
            Ok(to) => to,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "rename rejected");
                self.notice = Some(e.to_string());
                return DispatchResult::changed(Vec::new());
            }
        };
        if to == path {
            return DispatchResult::unchanged();
        }

        let mut effects = Vec::new();
        if self.bound_path() == Some(path.as_path()) {
            effects.extend(self.flush_pending_save());
            if let Some(binding) = self.binding.as_mut() {
                binding.set_renaming_to(Some(to.clone()));
            }
        }
        effects.push(Effect::RenameNote { from: path, to });
        DispatchResult::changed(effects)
    }

    /// Rebinds to the new path when the renamed note is the bound one. The buffer carries
    /// over; the follow-up read is a reload, so it cannot clobber edits made meanwhile.
    fn renamed(&mut self, from: PathBuf, to: PathBuf) -> DispatchResult {
        tracing::info!(from = %from.display(), to = %to.display(), "note renamed");
        let mut effects = vec![self.list_notes()];

        if self.bound_path() != Some(from.as_path()) {
            return DispatchResult::effects_only(effects);
        }
        let Some(old) = self.binding.take() else {
            return DispatchResult::effects_only(effects);
        };

        effects.push(Effect::Unwatch {
            slot: WatchSlot::Binding,
        });
        let generation = self.next_generation();
        let mut binding = FileBinding::new(to.clone(), generation);
        if old.is_loaded() {
            binding.mark_loaded();
        }
        if old.read_failed() {
            binding.mark_read_failed();
        }
        let dir = binding.start_watch();
        self.binding = Some(binding);

        effects.push(Effect::Watch {
            slot: WatchSlot::Binding,
            dir,
            generation,
        });
        effects.push(Effect::ReadFile {
            generation,
            path: to,
            purpose: ReadPurpose::Reload,
        });
        DispatchResult::changed(effects)
    }

    fn delete(&mut self, path: PathBuf) -> DispatchResult {
        let mut effects = Vec::new();
        if self.bound_path() == Some(path.as_path()) {
            effects.extend(self.unbind());
        }
        effects.push(Effect::DeleteNote { path });
        DispatchResult::changed(effects)
    }

    fn fs_op_failed(&mut self, op: &'static str, path: &Path, error: &str) -> DispatchResult {
        tracing::warn!(op, path = %path.display(), error = %error, "file operation failed");
        if let Some(binding) = self.binding.as_mut() {
            if op == "rename" && binding.path() == path {
                binding.set_renaming_to(None);
            }
        }
        self.notice = Some(format!("{} failed for {}: {}", op, path.display(), error));
        DispatchResult::changed(Vec::new())
    }

    fn toggle_view(&mut self) -> DispatchResult {
        match self.view_mode {
            ViewMode::Edit => {
                self.view_mode = ViewMode::Preview;
                self.surface.set_enabled(false);
                DispatchResult::changed(Vec::new())
            }
            ViewMode::Preview => {
                self.view_mode = ViewMode::Edit;
                let editable = self
                    .binding
                    .as_ref()
                    .is_some_and(FileBinding::is_editable);
                self.surface.set_enabled(editable);
                DispatchResult::changed(vec![Effect::FocusEditor])
            }
        }
    }

    // ---- watcher ---------------------------------------------------------------------

    fn watch_event(
        &mut self,
        target: WatchTarget,
        kind: WatchEventKind,
        filename: &str,
    ) -> DispatchResult {
        match target {
            WatchTarget::Listing => {
                if notes::is_note_name(filename, &self.config.note_extension) {
                    DispatchResult::effects_only(vec![self.list_notes()])
                } else {
                    DispatchResult::unchanged()
                }
            }
            WatchTarget::Binding(generation) => {
                let Some(binding) = self.binding.as_ref() else {
                    return DispatchResult::unchanged();
                };
                if binding.generation() != generation || binding.watch_dir().is_none() {
                    tracing::debug!(
                        filename,
                        generation = generation.raw(),
                        "dropping event from retired watcher"
                    );
                    return DispatchResult::unchanged();
                }
                if binding.file_name() != Some(filename) {
                    return DispatchResult::unchanged();
                }
                tracing::debug!(filename, ?kind, "bound note changed on disk");
                DispatchResult::effects_only(vec![Effect::ReadFile {
                    generation,
                    path: binding.path().to_path_buf(),
                    purpose: ReadPurpose::Reload,
                }])
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/session.rs"]
mod tests;
