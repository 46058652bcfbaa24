//! Snapshot store: archive, retention cleanup, restore
//!
//! Layout under the archive root:
//! ```text
//! archives/
//!   20250314_213005/   <- full copy of the source tree
//!   20250314_214410/
//!   ...
//! ```

use crate::retention::RetentionPolicy;
use crate::snapshot::{scan, Archive};
use crate::Result;
use parking_lot::Mutex;
use savewarden_core::{copy_tree, ArchiveName, CopyMode, CopyStats, Error, WatchConfig};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Result of a retention pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// Evicted snapshots, oldest first
    pub removed: Vec<ArchiveName>,
    /// Snapshots left after the pass
    pub remaining: usize,
}

/// Result of a restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub name: String,
    pub stats: CopyStats,
}

/// Owns the archive root and every snapshot under it
///
/// `archive` + `cleanup` and `restore` run under one mutex so a manual
/// snapshot and a triggered one never interleave their directory listings.
pub struct ArchiveStore {
    /// Tree copied into each snapshot and restored into
    source: PathBuf,
    /// Directory holding the snapshots
    root: PathBuf,
    retention: RetentionPolicy,
    lock: Mutex<()>,
}

impl ArchiveStore {
    pub fn new(source: impl Into<PathBuf>, root: impl Into<PathBuf>, retention: RetentionPolicy) -> Self {
        Self {
            source: source.into(),
            root: root.into(),
            retention,
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(
            &config.source_path,
            &config.archive_root,
            RetentionPolicy::new(config.max_archives),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot the source tree now, then apply retention
    pub fn archive(&self) -> Result<Archive> {
        self.archive_named(ArchiveName::now())
    }

    /// Snapshot the source tree under an explicit name, then apply retention
    ///
    /// Fails with `ArchiveExists` if `name` is already taken (two archives in
    /// the same second). If the copy fails, the partial snapshot is removed
    /// and no new archive exists afterwards. Retention failures are logged
    /// and do not fail the archive.
    pub fn archive_named(&self, name: ArchiveName) -> Result<Archive> {
        let _guard = self.lock.lock();

        if !self.source.is_dir() {
            return Err(Error::SourceUnavailable(self.source.clone()));
        }

        fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;

        let path = self.root.join(name.to_string());
        match fs::create_dir(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Error::ArchiveExists(path));
            }
            Err(e) => return Err(Error::io(&path, e)),
        }

        let stats = match copy_tree(&self.source, &path, CopyMode::Fresh) {
            Ok(stats) => stats,
            Err(e) => {
                if let Err(rm) = fs::remove_dir_all(&path) {
                    warn!(archive = %name, error = %rm, "Failed to remove partial archive");
                }
                return Err(e);
            }
        };

        info!(
            archive = %name,
            files = stats.files,
            bytes = stats.bytes,
            "Archive saved"
        );

        if let Err(e) = self.evict() {
            warn!(error = %e, "Retention cleanup failed; collection stays oversized until the next cleanup");
        }

        Ok(Archive::new(name, path))
    }

    /// Remove the oldest snapshots until at most `max_archives` remain
    ///
    /// Idempotent. Stops at the first snapshot that cannot be removed so
    /// eviction order stays oldest-first.
    pub fn cleanup(&self) -> Result<EvictionReport> {
        let _guard = self.lock.lock();
        self.evict()
    }

    fn evict(&self) -> Result<EvictionReport> {
        let archives = scan(&self.root)?;
        let doomed = self.retention.overflow(&archives);

        let mut removed = Vec::with_capacity(doomed.len());
        for archive in doomed {
            fs::remove_dir_all(archive.path()).map_err(|source| Error::Eviction {
                name: archive.name().to_string(),
                source,
            })?;
            info!(archive = %archive.name(), "Evicted old archive");
            removed.push(archive.name());
        }

        Ok(EvictionReport {
            remaining: archives.len() - removed.len(),
            removed,
        })
    }

    /// All snapshots, oldest first
    pub fn list(&self) -> Result<Vec<Archive>> {
        scan(&self.root)
    }

    /// Copy a snapshot back over the source tree
    ///
    /// Same-named entries are overwritten; entries that exist only in the
    /// source tree are kept. A missing snapshot is reported as
    /// `ArchiveNotFound` before anything is touched.
    pub fn restore(&self, name: &str) -> Result<RestoreReport> {
        let _guard = self.lock.lock();

        check_name(name)?;
        let path = self.root.join(name);
        if !path.is_dir() {
            warn!(archive = name, "Archive does not exist");
            return Err(Error::ArchiveNotFound(name.to_string()));
        }

        info!(archive = name, dest = %self.source.display(), "Restoring archive");
        let stats = copy_tree(&path, &self.source, CopyMode::Overwrite)?;
        info!(archive = name, files = stats.files, "Archive restored");

        Ok(RestoreReport {
            name: name.to_string(),
            stats,
        })
    }
}

/// A restore name must be one plain path component
fn check_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::InvalidArchiveName(name.to_string())),
    }
}
