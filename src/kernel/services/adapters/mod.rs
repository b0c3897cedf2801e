//! Service adapters: OS/runtime specific implementations (IO/async/watching).

pub mod file;
pub mod file_watcher;
pub mod paths;
pub mod runtime;
pub mod settings;

pub use file::LocalFileProvider;
pub use file_watcher::{DirectoryWatcher, WatchRegistry, WATCHER_POLL_INTERVAL};
pub use paths::{ensure_log_dir, get_app_data_dir, get_cache_dir, get_log_dir};
pub use runtime::{execute_effect, AsyncRuntime};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, SettingsError,
};
