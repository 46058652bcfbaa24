//! Snapshot directories under the archive root

use crate::Result;
use savewarden_core::copy::dir_size;
use savewarden_core::{ArchiveName, Error};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One snapshot: an immutable copy of the source tree at trigger time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    name: ArchiveName,
    path: PathBuf,
}

impl Archive {
    pub fn new(name: ArchiveName, path: PathBuf) -> Self {
        Self { name, path }
    }

    pub fn name(&self) -> ArchiveName {
        self.name
    }

    /// Snapshot directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes of file content inside the snapshot
    pub fn size(&self) -> Result<u64> {
        dir_size(&self.path)
    }
}

/// List snapshots under `root`, oldest first
///
/// Only directories whose names parse as archive names count; anything
/// else in the root is left alone. A missing root is an empty collection.
pub fn scan(root: &Path) -> Result<Vec<Archive>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(root, e)),
    };

    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        if let Some(name) = file_name.to_str().and_then(ArchiveName::parse) {
            archives.push(Archive::new(name, entry.path()));
        }
    }

    archives.sort_by_key(|a| a.name);
    Ok(archives)
}
