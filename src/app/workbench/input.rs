//! 键位映射与输入分发

use super::{Focus, Prompt, PromptKind, PromptOutcome, Workbench};
use crate::kernel::notes;
use crate::kernel::{Action, EditKey, Motion};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleView,
    NewNote,
    OpenPrompt,
    RenamePrompt,
    DeletePrompt,
    Refresh,
    FocusExplorer,
    FocusEditor,
    ExplorerUp,
    ExplorerDown,
    ExplorerSelect,
    ScrollPreview(i16),
    Session(Action),
}

/// Maps a key press to a command for the focused area. `None` means the key is unbound.
pub fn command_for_key(key: KeyEvent, focus: Focus) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        let global = match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('e') => Some(Command::ToggleView),
            KeyCode::Char('n') => Some(Command::NewNote),
            KeyCode::Char('o') => Some(Command::OpenPrompt),
            KeyCode::Char('r') => Some(Command::Refresh),
            KeyCode::Char('b') => Some(Command::FocusExplorer),
            _ => None,
        };
        if global.is_some() {
            return global;
        }
    }
    if key.code == KeyCode::F(2) {
        return Some(Command::RenamePrompt);
    }

    match focus {
        Focus::Explorer => explorer_command(key),
        Focus::Editor => editor_command(key, ctrl, shift),
    }
}

fn explorer_command(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Command::ExplorerUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::ExplorerDown),
        KeyCode::Enter => Some(Command::ExplorerSelect),
        KeyCode::Delete => Some(Command::DeletePrompt),
        KeyCode::Tab | KeyCode::Right => Some(Command::FocusEditor),
        _ => None,
    }
}

fn editor_command(key: KeyEvent, ctrl: bool, shift: bool) -> Option<Command> {
    let motion = |motion: Motion| {
        Some(Command::Session(Action::Move {
            motion,
            extend: shift,
        }))
    };

    match key.code {
        KeyCode::Esc => Some(Command::FocusExplorer),
        KeyCode::Char('z') if ctrl && shift => Some(Command::Session(Action::Redo)),
        KeyCode::Char('Z') if ctrl => Some(Command::Session(Action::Redo)),
        KeyCode::Char('z') if ctrl => Some(Command::Session(Action::Undo)),
        KeyCode::Char('y') if ctrl => Some(Command::Session(Action::Redo)),
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(ch) => Some(Command::Session(Action::Key(EditKey::Char(ch)))),
        KeyCode::Tab => Some(Command::Session(Action::Key(EditKey::Tab))),
        KeyCode::BackTab => Some(Command::Session(Action::Key(EditKey::BackTab))),
        KeyCode::Enter => Some(Command::Session(Action::Key(EditKey::Enter))),
        KeyCode::Backspace => Some(Command::Session(Action::Key(EditKey::Backspace))),
        KeyCode::Delete => Some(Command::Session(Action::DeleteForward)),
        KeyCode::Left => motion(Motion::Left),
        KeyCode::Right => motion(Motion::Right),
        KeyCode::Up => motion(Motion::Up),
        KeyCode::Down => motion(Motion::Down),
        KeyCode::Home if ctrl => motion(Motion::DocStart),
        KeyCode::End if ctrl => motion(Motion::DocEnd),
        KeyCode::Home => motion(Motion::LineStart),
        KeyCode::End => motion(Motion::LineEnd),
        KeyCode::PageUp => Some(Command::ScrollPreview(-10)),
        KeyCode::PageDown => Some(Command::ScrollPreview(10)),
        _ => None,
    }
}

impl Workbench {
    /// Returns true when the screen needs a redraw.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        if let Some(prompt) = self.prompt.as_mut() {
            return match prompt.handle_key(key) {
                PromptOutcome::Pending => true,
                PromptOutcome::Cancelled => {
                    self.prompt = None;
                    true
                }
                PromptOutcome::Submitted(input) => {
                    if let Some(prompt) = self.prompt.take() {
                        self.submit_prompt(prompt.kind().clone(), input);
                    }
                    true
                }
            };
        }

        match command_for_key(key, self.focus) {
            Some(command) => self.run_command(command),
            None => false,
        }
    }

    pub fn run_command(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => {
                self.quit = true;
                true
            }
            Command::ToggleView => {
                self.preview_scroll = 0;
                self.dispatch(Action::ToggleView)
            }
            Command::NewNote => self.dispatch(Action::CreateUntitled),
            Command::OpenPrompt => {
                self.prompt = Some(Prompt::new(PromptKind::OpenPath, ""));
                true
            }
            Command::RenamePrompt => {
                let target = match self.focus {
                    Focus::Explorer => self.selected_note_path(),
                    Focus::Editor => self.session.bound_path().map(|p| p.to_path_buf()),
                };
                let Some(path) = target else {
                    return false;
                };
                let stem = notes::display_stem(&path);
                self.prompt = Some(Prompt::new(PromptKind::Rename(path), stem));
                true
            }
            Command::DeletePrompt => {
                let Some(path) = self.selected_note_path() else {
                    return false;
                };
                self.prompt = Some(Prompt::new(PromptKind::ConfirmDelete(path), ""));
                true
            }
            Command::Refresh => self.dispatch(Action::RefreshListing),
            Command::FocusExplorer => {
                self.focus = Focus::Explorer;
                true
            }
            Command::FocusEditor => {
                self.focus = Focus::Editor;
                true
            }
            Command::ExplorerUp => {
                self.explorer_selected = self.explorer_selected.saturating_sub(1);
                true
            }
            Command::ExplorerDown => {
                if self.explorer_selected + 1 < self.session.notes().len() {
                    self.explorer_selected += 1;
                }
                true
            }
            Command::ExplorerSelect => {
                let Some(path) = self.selected_note_path() else {
                    return false;
                };
                self.focus = Focus::Editor;
                self.editor_scroll = 0;
                self.dispatch(Action::SelectNote(path))
            }
            Command::ScrollPreview(delta) => {
                self.preview_scroll = self.preview_scroll.saturating_add_signed(delta);
                true
            }
            Command::Session(action) => self.dispatch(action),
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, input: String) {
        match kind {
            PromptKind::Rename(path) => {
                self.dispatch(Action::RenameNote {
                    path,
                    new_name: input,
                });
            }
            PromptKind::OpenPath => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return;
                }
                self.focus = Focus::Editor;
                self.editor_scroll = 0;
                self.dispatch(Action::OpenPath(PathBuf::from(trimmed)));
            }
            PromptKind::ConfirmDelete(path) => {
                self.dispatch(Action::DeleteNote(path));
            }
        }
    }
}
