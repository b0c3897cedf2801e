//! Terminal plumbing for the ratatui frontend: raw mode, alternate screen and the
//! termination signals that must put the terminal back.

pub mod terminal_guard;

pub use terminal_guard::{
    install_termination_signals, CrosstermTerminalOps, TerminalGuard, TerminalOps,
    TerminalRestorer, TerminationSignal,
};
