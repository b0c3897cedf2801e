//! 数据模型层

pub mod edit_history;
pub mod selection;
pub mod text_buffer;

pub use edit_history::{EditHistory, DEFAULT_HISTORY_LIMIT};
pub use selection::Selection;
pub use text_buffer::{slice_to_cow, TextBuffer};
