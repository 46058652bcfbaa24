//! Recursive notify watch that emits normalized change events

use crate::{ChangeEvent, ChangeKind, WatchError};
use crossbeam_channel::{unbounded, Receiver};
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Item delivered on the event channel
#[derive(Debug)]
pub enum SourceMessage {
    Event(ChangeEvent),
    /// The backend reported an error; the listener should be considered dead
    Failed(WatchError),
}

/// Live recursive watch on one directory
///
/// The OS backend blocks on its own thread until notified; events are
/// pushed onto an unbounded channel in arrival order. Dropping the
/// source (or calling `stop`) tears the OS watch down.
pub struct EventSource {
    root: PathBuf,
    watcher: Option<RecommendedWatcher>,
    events: Receiver<SourceMessage>,
}

impl EventSource {
    /// Start watching `root` recursively
    ///
    /// Fails fast with `TargetUnavailable` if `root` is not an existing directory.
    pub fn start(root: &Path) -> Result<Self, WatchError> {
        if !root.is_dir() {
            return Err(WatchError::TargetUnavailable(root.to_path_buf()));
        }

        let (tx, rx) = unbounded();
        let mut seq = 0u64;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    for mut change in classify(&event) {
                        change.seq = seq;
                        seq += 1;
                        if tx.send(SourceMessage::Event(change)).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    let _ = tx.send(SourceMessage::Failed(err.into()));
                }
            },
            Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        info!(root = %root.display(), "Watching for changes");

        Ok(Self {
            root: root.to_path_buf(),
            watcher: Some(watcher),
            events: rx,
        })
    }

    /// A handle to the event channel (receivers are cheap clones)
    pub fn subscribe(&self) -> Receiver<SourceMessage> {
        self.events.clone()
    }

    /// Whether the OS watch is still installed
    pub fn is_active(&self) -> bool {
        self.watcher.is_some()
    }

    /// Remove the OS watch. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.root) {
                debug!(root = %self.root.display(), error = %e, "unwatch failed");
            }
            info!(root = %self.root.display(), "Stopped watching");
        }
    }
}

impl Drop for EventSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Map one notify event onto zero or more change events
///
/// Only creations and modifications are kept. A rename's destination is
/// reported as a creation; removals and access events are dropped.
pub fn classify(event: &notify::Event) -> Vec<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) => return Vec::new(),
        EventKind::Modify(_) => ChangeKind::Modified,
        _ => {
            trace!(kind = ?event.kind, "ignoring event");
            return Vec::new();
        }
    };

    event
        .paths
        .iter()
        .map(|path| {
            let is_dir = match event.kind {
                EventKind::Create(CreateKind::Folder) => true,
                EventKind::Create(CreateKind::File) => false,
                _ => path.is_dir(),
            };
            ChangeEvent {
                path: path.clone(),
                kind,
                is_dir,
                seq: 0,
            }
        })
        .collect()
}
