//! File system watching for savewarden
//!
//! This crate provides:
//! - `EventSource`: recursive notify watch producing ordered `ChangeEvent`s
//! - `TriggerStateMachine`: the two-phase marker/round-file detector
//!
//! Events are never coalesced or debounced by time; every notification is
//! delivered in arrival order.

pub mod source;
pub mod trigger;

pub use source::{EventSource, SourceMessage};
pub use trigger::{Decision, EventClass, PathMatcher, TriggerState, TriggerStateMachine};

use std::path::PathBuf;
use thiserror::Error;

/// One file system notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: ChangeKind,
    /// Whether the path was a directory when the event was classified
    pub is_dir: bool,
    /// Arrival order within one `EventSource`, starting at 0
    pub seq: u64,
}

/// Type of file system event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File or directory created
    Created,
    /// File or directory contents/metadata modified
    Modified,
}

impl ChangeEvent {
    /// Build a file event (no sequence number)
    pub fn file(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            is_dir: false,
            seq: 0,
        }
    }

    /// Build a directory event (no sequence number)
    pub fn dir(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            is_dir: true,
            seq: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum WatchError {
    /// Watch root missing when the listener was started
    #[error("watch target unavailable: {}", .0.display())]
    TargetUnavailable(PathBuf),

    /// The OS notification backend reported an error
    #[error("file watcher error")]
    Notify(#[from] notify::Error),

    /// The notification channel closed while the watch was still active
    #[error("file watcher channel closed unexpectedly")]
    ListenerClosed,
}
