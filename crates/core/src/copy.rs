//! Recursive directory copy used by snapshot and restore

use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// How `copy_tree` treats entries that already exist at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Destination is a freshly created, empty directory
    Fresh,
    /// Layer the source over the destination: same-named entries are
    /// replaced, entries missing from the source are left alone
    Overwrite,
}

/// Counters reported after a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

/// Copy every entry below `src` into `dst`, preserving the relative layout
///
/// `dst` is created if missing. File contents are copied byte-for-byte;
/// symlinks are followed so the copy never points back into `src`.
pub fn copy_tree(src: &Path, dst: &Path, mode: CopyMode) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;

    for entry in WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| Error::Walk {
            path: source.path().unwrap_or(src).to_path_buf(),
            source,
        })?;

        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            if mode == CopyMode::Overwrite {
                clear_conflict(&target, true)?;
            }
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            stats.dirs += 1;
        } else {
            if mode == CopyMode::Overwrite {
                clear_conflict(&target, false)?;
            }
            let bytes = fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
            stats.files += 1;
            stats.bytes += bytes;
        }
    }

    Ok(stats)
}

/// Remove whatever sits at `target` if its type differs from the incoming entry
///
/// Symlinks are always removed so the copy never writes outside the destination.
fn clear_conflict(target: &Path, incoming_dir: bool) -> Result<()> {
    let meta = match fs::symlink_metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(target, e)),
    };

    let result = if meta.file_type().is_symlink() {
        debug!(path = %target.display(), "Replacing symlink");
        fs::remove_file(target).or_else(|_| fs::remove_dir(target))
    } else if incoming_dir && !meta.is_dir() {
        debug!(path = %target.display(), "Replacing file with directory");
        fs::remove_file(target)
    } else if !incoming_dir && meta.is_dir() {
        debug!(path = %target.display(), "Replacing directory with file");
        fs::remove_dir_all(target)
    } else {
        Ok(())
    };

    result.map_err(|e| Error::io(target, e))
}

/// Total size in bytes of all files below `dir` (0 if it does not exist)
pub fn dir_size(dir: &Path) -> Result<u64> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut total = 0u64;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| Error::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            let meta = entry.metadata().map_err(|source| Error::Walk {
                path: entry.path().to_path_buf(),
                source,
            })?;
            total += meta.len();
        }
    }

    Ok(total)
}
