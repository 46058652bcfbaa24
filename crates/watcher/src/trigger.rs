//! Two-phase "save completed" detection
//!
//! The game writes its end-of-round marker file first and a round JSON file
//! second. Only that ordered pair fires an archive:
//!
//! ```text
//!            marker modified                round file modified
//!   Idle ───────────────────────▶ Armed ─────────────────────────▶ Idle (fire)
//!    │  ▲                          │ ▲
//!    └──┘ round file (ignored)     └─┘ marker modified again
//! ```
//!
//! There is no time window: an armed machine stays armed until the round
//! file arrives.

use crate::{ChangeEvent, ChangeKind};
use savewarden_core::{RoundRule, TriggerPatterns};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Marker not seen since the last fire
    Idle,
    /// Marker seen; the next round-file write fires
    Armed,
}

/// What an event means to the trigger, independent of state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    Directory,
    Marker,
    RoundFile,
    Other,
}

/// Outcome of feeding one event to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No state change
    Ignored,
    /// Marker seen; machine is (still) armed
    Armed,
    /// Round file seen while idle; pattern out of order
    Unarmed,
    /// Round file seen while armed; caller must archive now
    Fire,
}

/// Path predicates relative to the watch root
///
/// Matching works on path components, so it is independent of the
/// platform's separator.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    root: PathBuf,
    patterns: TriggerPatterns,
}

impl PathMatcher {
    pub fn new(root: impl Into<PathBuf>, patterns: TriggerPatterns) -> Self {
        Self {
            root: root.into(),
            patterns,
        }
    }

    /// File named exactly like the marker, anywhere below the root
    pub fn is_marker(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            && path.file_name() == Some(OsStr::new(&self.patterns.marker_file))
    }

    /// `.json` file matching the round rule
    pub fn is_round_file(&self, path: &Path) -> bool {
        if path.extension() != Some(OsStr::new("json")) {
            return false;
        }
        let rel = match path.strip_prefix(&self.root) {
            Ok(rel) => rel,
            Err(_) => return false,
        };

        match &self.patterns.round_rule {
            RoundRule::Subdir { dir } => {
                // The file itself must sit below the directory, not be it
                rel.starts_with(dir) && rel.components().count() > Path::new(dir).components().count()
            }
            RoundRule::FilePrefix { prefix } => rel.components().any(|c| match c {
                Component::Normal(name) => name.to_string_lossy().starts_with(prefix.as_str()),
                _ => false,
            }),
        }
    }

    /// Classify an event; the marker wins when a path matches both rules
    pub fn classify(&self, event: &ChangeEvent) -> EventClass {
        if event.is_dir {
            EventClass::Directory
        } else if self.is_marker(&event.path) {
            EventClass::Marker
        } else if self.is_round_file(&event.path) {
            EventClass::RoundFile
        } else {
            EventClass::Other
        }
    }
}

/// Order-based two-state debouncer
///
/// Owns the only piece of trigger state. It is created `Idle` and never
/// persisted. A `Fire` decision has already returned the machine to
/// `Idle`, so the state is cleared whether or not the archive that
/// follows succeeds.
#[derive(Debug)]
pub struct TriggerStateMachine {
    matcher: PathMatcher,
    state: TriggerState,
}

impl TriggerStateMachine {
    pub fn new(matcher: PathMatcher) -> Self {
        Self {
            matcher,
            state: TriggerState::Idle,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Feed one event and return what the caller should do
    pub fn observe(&mut self, event: &ChangeEvent) -> Decision {
        let class = self.matcher.classify(event);
        debug!(
            path = %event.path.display(),
            kind = ?event.kind,
            class = ?class,
            seq = event.seq,
            "classified event"
        );

        if event.kind != ChangeKind::Modified {
            return Decision::Ignored;
        }

        match (class, self.state) {
            (EventClass::Marker, previous) => {
                self.state = TriggerState::Armed;
                if previous == TriggerState::Idle {
                    info!(path = %event.path.display(), "Marker written, trigger armed");
                }
                Decision::Armed
            }
            (EventClass::RoundFile, TriggerState::Armed) => {
                self.state = TriggerState::Idle;
                info!(path = %event.path.display(), "Round file written, firing archive");
                Decision::Fire
            }
            (EventClass::RoundFile, TriggerState::Idle) => {
                debug!(path = %event.path.display(), "Round file written without marker, ignoring");
                Decision::Unarmed
            }
            _ => Decision::Ignored,
        }
    }
}
