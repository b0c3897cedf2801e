//! 应用层：终端工作台

pub mod theme;
pub mod workbench;

pub use theme::UiTheme;
pub use workbench::{command_for_key, Command, Focus, Prompt, PromptKind, PromptOutcome, Workbench};
