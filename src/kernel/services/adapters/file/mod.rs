//! 文件服务模块
//!
//! 本地文件系统后端；会话层只通过 `FileProvider` 访问它

pub mod local;

pub use local::LocalFileProvider;
