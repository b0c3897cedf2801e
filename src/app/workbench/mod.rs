//! 工作台模块：把终端输入翻译成会话动作，执行副作用，并负责绘制

use super::theme::UiTheme;
use crate::kernel::services::adapters::{AsyncRuntime, WatchRegistry};
use crate::kernel::services::ports::EditorConfig;
use crate::kernel::services::KernelBusReceiver;
use crate::kernel::{Action, Effect, NoteSession};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

mod input;
mod preview_text;
mod prompt;
mod render;
mod tick;

pub use input::{command_for_key, Command};
pub use preview_text::preview_lines;
pub use prompt::{Prompt, PromptKind, PromptOutcome};

const LOG_BUFFER_CAP: usize = 200;
const MAX_LOG_DRAIN_PER_TICK: usize = 256;
/// Upper bound on how long the main loop may block waiting for terminal input.
const IDLE_POLL: Duration = Duration::from_millis(50);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Explorer,
    Editor,
}

pub struct Workbench {
    session: NoteSession,
    runtime: AsyncRuntime,
    watchers: WatchRegistry,
    bus_rx: KernelBusReceiver,
    log_rx: Option<Receiver<String>>,
    logs: VecDeque<String>,
    focus: Focus,
    explorer_selected: usize,
    prompt: Option<Prompt>,
    editor_scroll: usize,
    preview_scroll: u16,
    theme: UiTheme,
    quit: bool,
}

impl Workbench {
    pub fn new(
        config: EditorConfig,
        runtime: AsyncRuntime,
        bus_rx: KernelBusReceiver,
        log_rx: Option<Receiver<String>>,
    ) -> Self {
        let watchers = WatchRegistry::new(config.watcher_poll_interval());
        let mut workbench = Self {
            session: NoteSession::new(config),
            runtime,
            watchers,
            bus_rx,
            log_rx,
            logs: VecDeque::new(),
            focus: Focus::Explorer,
            explorer_selected: 0,
            prompt: None,
            editor_scroll: 0,
            preview_scroll: 0,
            theme: UiTheme::default(),
            quit: false,
        };
        let startup = workbench.session.startup();
        for follow_up in workbench.run_effects(startup.effects) {
            workbench.dispatch(follow_up);
        }
        workbench
    }

    pub fn session(&self) -> &NoteSession {
        &self.session
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Writes out a pending save and waits for the effect worker to finish it.
    pub fn shutdown(self) {
        let Self {
            mut session,
            runtime,
            ..
        } = self;
        let result = session.shutdown();
        runtime.execute(&result.effects);
        if !runtime.shutdown(SHUTDOWN_GRACE) {
            tracing::warn!("pending writes may not have reached disk");
        }
    }

    /// Opens `path` on startup (a note passed on the command line).
    pub fn open_initial(&mut self, path: PathBuf) {
        self.focus = Focus::Editor;
        self.dispatch(Action::OpenPath(path));
    }

    /// How long the main loop may wait for input before the next tick is due.
    pub fn poll_timeout(&self) -> Duration {
        match self.session.next_deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    /// Dispatches `action` and everything it triggers synchronously (watcher setup
    /// failures). Returns true when the screen needs a redraw.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let mut queue = VecDeque::from([action]);
        let mut changed = false;
        while let Some(action) = queue.pop_front() {
            let result = self.session.dispatch(action, Instant::now());
            changed |= result.state_changed;
            changed |= !result.effects.is_empty();
            queue.extend(self.run_effects(result.effects));
        }
        self.clamp_explorer_selection();
        changed
    }

    /// Hands I/O effects to the runtime in batch order and applies the frontend ones
    /// (watchers, focus) in place. Returns follow-up actions.
    fn run_effects(&mut self, effects: Vec<Effect>) -> Vec<Action> {
        if effects.is_empty() {
            return Vec::new();
        }
        self.runtime.execute(&effects);

        let mut follow_ups = Vec::new();
        for effect in &effects {
            match effect {
                Effect::Watch { .. } | Effect::Unwatch { .. } => {
                    follow_ups.extend(self.watchers.apply(effect));
                }
                Effect::FocusEditor => self.focus = Focus::Editor,
                _ => {}
            }
        }
        follow_ups
    }

    fn selected_note_path(&self) -> Option<PathBuf> {
        self.session
            .notes()
            .get(self.explorer_selected)
            .map(|name| self.session.config().notes_dir.join(name))
    }

    fn clamp_explorer_selection(&mut self) {
        let len = self.session.notes().len();
        if len == 0 {
            self.explorer_selected = 0;
        } else if self.explorer_selected >= len {
            self.explorer_selected = len - 1;
        }
    }

    pub fn latest_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
