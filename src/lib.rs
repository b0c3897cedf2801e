//! marknote - markdown 笔记编辑器的同步内核
//!
//! 模块结构：
//! - models: 数据模型（TextBuffer, Selection, EditHistory）
//! - kernel: 会话内核（NoteSession, 编辑自动化, 去抖, 预览渲染, 服务端口与适配器）
//! - app: 终端前端（Workbench）
//! - tui: 终端状态守卫与信号处理

pub mod kernel;
pub mod models;

#[cfg(feature = "tui")]
pub mod app;
#[cfg(feature = "tui")]
pub mod tui;
