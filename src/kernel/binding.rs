//! The association between the editor buffer and a note on disk.

use std::path::{Path, PathBuf};

/// Bumped every time the buffer is bound to a (possibly identical) path. I/O completions
/// carry the generation they were issued for and are dropped when it no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BindingGeneration(u64);

impl BindingGeneration {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBinding {
    path: PathBuf,
    generation: BindingGeneration,
    /// Directory the binding watcher was asked to watch. Always `path`'s parent.
    watch_dir: Option<PathBuf>,
    /// Initial read finished successfully.
    loaded: bool,
    /// Most recent read (load or reload) failed.
    read_failed: bool,
    /// A rename of the bound note is in flight.
    renaming_to: Option<PathBuf>,
}

impl FileBinding {
    pub fn new(path: PathBuf, generation: BindingGeneration) -> Self {
        Self {
            path,
            generation,
            watch_dir: None,
            loaded: false,
            read_failed: false,
            renaming_to: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn generation(&self) -> BindingGeneration {
        self.generation
    }

    /// True when a completion issued for `(generation, path)` still belongs to this binding.
    pub fn matches(&self, generation: BindingGeneration, path: &Path) -> bool {
        self.generation == generation && self.path == path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    pub fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn watch_dir(&self) -> Option<&Path> {
        self.watch_dir.as_deref()
    }

    pub fn start_watch(&mut self) -> PathBuf {
        let dir = self.parent_dir();
        self.watch_dir = Some(dir.clone());
        dir
    }

    pub fn clear_watch(&mut self) {
        self.watch_dir = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn read_failed(&self) -> bool {
        self.read_failed
    }

    pub fn mark_loaded(&mut self) {
        self.loaded = true;
        self.read_failed = false;
    }

    pub fn mark_read_failed(&mut self) {
        self.read_failed = true;
    }

    /// Editable means a successful initial read and no read failure since.
    pub fn is_editable(&self) -> bool {
        self.loaded && !self.read_failed
    }

    pub fn renaming_to(&self) -> Option<&Path> {
        self.renaming_to.as_deref()
    }

    pub fn set_renaming_to(&mut self, target: Option<PathBuf>) {
        self.renaming_to = target;
    }
}
