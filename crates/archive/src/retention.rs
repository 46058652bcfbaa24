//! Retention policy for snapshots

use crate::Archive;

/// Keeps the newest `max_archives` snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Snapshots to keep; zero or negative evicts everything
    pub max_archives: i64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { max_archives: 20 }
    }
}

impl RetentionPolicy {
    pub fn new(max_archives: i64) -> Self {
        Self { max_archives }
    }

    /// Number of snapshots allowed to survive
    pub fn keep(&self) -> usize {
        usize::try_from(self.max_archives).unwrap_or(0)
    }

    /// The oldest entries that exceed the bound, in eviction order
    ///
    /// `archives` must be sorted oldest first.
    pub fn overflow<'a>(&self, archives: &'a [Archive]) -> &'a [Archive] {
        let excess = archives.len().saturating_sub(self.keep());
        &archives[..excess]
    }
}
