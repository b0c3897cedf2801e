use crate::kernel::action::{Action, WatchEventKind, WatchTarget};
use crate::kernel::binding::BindingGeneration;
use crate::kernel::effect::{Effect, WatchSlot};
use notify::event::{MetadataKind, ModifyKind};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

pub const WATCHER_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
struct DirDelta {
    kind: WatchEventKind,
    path: PathBuf,
}

/// Non-recursive watch on one directory. Events are reduced to `(kind, file name)`.
pub struct DirectoryWatcher {
    watcher: RecommendedWatcher,
    raw_event_rx: mpsc::Receiver<notify::Event>,
    dir: PathBuf,
}

impl DirectoryWatcher {
    pub fn new(dir: &Path, poll_interval: Duration) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                let _ = tx.send(event);
            },
            Config::default().with_poll_interval(poll_interval),
        )?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(Self {
            watcher,
            raw_event_rx: rx,
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pending events as `(kind, file name)`, first occurrence order, duplicates folded.
    pub fn drain(&mut self) -> Vec<(WatchEventKind, String)> {
        let _watcher_guard = &self.watcher;

        let mut seen: FxHashSet<(WatchEventKind, String)> = FxHashSet::default();
        let mut out = Vec::new();
        while let Ok(event) = self.raw_event_rx.try_recv() {
            for delta in normalize_notify_event(event) {
                if delta.path == self.dir {
                    continue;
                }
                let Some(name) = delta.path.file_name() else {
                    continue;
                };
                let item = (delta.kind, name.to_string_lossy().to_string());
                if seen.insert(item.clone()) {
                    out.push(item);
                }
            }
        }
        out
    }
}

/// The two watcher slots the session drives: the notes listing and the bound note's
/// directory. Arming a slot replaces whatever it held before.
pub struct WatchRegistry {
    poll_interval: Duration,
    listing: Option<DirectoryWatcher>,
    binding: Option<(BindingGeneration, DirectoryWatcher)>,
}

impl WatchRegistry {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            listing: None,
            binding: None,
        }
    }

    pub fn watch(
        &mut self,
        slot: WatchSlot,
        dir: &Path,
        generation: BindingGeneration,
    ) -> Result<(), notify::Error> {
        // the old watcher goes first so a failure leaves the slot empty, never stale
        self.unwatch(slot);
        let watcher = DirectoryWatcher::new(dir, self.poll_interval)?;
        match slot {
            WatchSlot::Listing => self.listing = Some(watcher),
            WatchSlot::Binding => self.binding = Some((generation, watcher)),
        }
        tracing::debug!(?slot, dir = %dir.display(), "watching directory");
        Ok(())
    }

    pub fn unwatch(&mut self, slot: WatchSlot) {
        let dropped = match slot {
            WatchSlot::Listing => self.listing.take().is_some(),
            WatchSlot::Binding => self.binding.take().is_some(),
        };
        if dropped {
            tracing::debug!(?slot, "watcher closed");
        }
    }

    pub fn is_watching(&self, slot: WatchSlot) -> bool {
        match slot {
            WatchSlot::Listing => self.listing.is_some(),
            WatchSlot::Binding => self.binding.is_some(),
        }
    }

    pub fn binding_generation(&self) -> Option<BindingGeneration> {
        self.binding.as_ref().map(|(generation, _)| *generation)
    }

    /// Applies a `Watch`/`Unwatch` effect. A watcher that cannot be set up is reported
    /// back as `WatchFailed`; other effects are ignored.
    pub fn apply(&mut self, effect: &Effect) -> Option<Action> {
        match effect {
            Effect::Watch {
                slot,
                dir,
                generation,
            } => match self.watch(*slot, dir, *generation) {
                Ok(()) => None,
                Err(e) => Some(Action::WatchFailed {
                    slot: *slot,
                    error: e.to_string(),
                }),
            },
            Effect::Unwatch { slot } => {
                self.unwatch(*slot);
                None
            }
            _ => None,
        }
    }

    pub fn drain(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(watcher) = self.listing.as_mut() {
            actions.extend(
                watcher
                    .drain()
                    .into_iter()
                    .map(|(kind, filename)| Action::WatchEvent {
                        target: WatchTarget::Listing,
                        kind,
                        filename,
                    }),
            );
        }
        if let Some((generation, watcher)) = self.binding.as_mut() {
            let generation = *generation;
            actions.extend(
                watcher
                    .drain()
                    .into_iter()
                    .map(|(kind, filename)| Action::WatchEvent {
                        target: WatchTarget::Binding(generation),
                        kind,
                        filename,
                    }),
            );
        }
        actions
    }
}

impl Default for WatchRegistry {
    fn default() -> Self {
        Self::new(WATCHER_POLL_INTERVAL)
    }
}

/// Creates, removals and renames all count as `Rename`; content writes are `Change`.
fn normalize_notify_event(event: notify::Event) -> Vec<DirDelta> {
    let kind = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => WatchEventKind::Rename,
        EventKind::Modify(ModifyKind::Name(_)) => WatchEventKind::Rename,
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)) => return Vec::new(),
        EventKind::Modify(_) => WatchEventKind::Change,
        _ => return Vec::new(),
    };
    event
        .paths
        .into_iter()
        .map(|path| DirDelta { kind, path })
        .collect()
}
