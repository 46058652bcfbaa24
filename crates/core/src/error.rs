//! Error type shared by the savewarden crates

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core and archive operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The directory snapshots are copied from does not exist
    #[error("archive source unavailable: {}", .0.display())]
    SourceUnavailable(PathBuf),

    /// Restore was asked for a snapshot that is not under the archive root
    #[error("archive not found: {0}")]
    ArchiveNotFound(String),

    /// A snapshot with the same timestamp was already created this second
    #[error("archive already exists: {}", .0.display())]
    ArchiveExists(PathBuf),

    #[error("invalid archive name: {0:?}")]
    InvalidArchiveName(String),

    /// Retention could not remove an old snapshot
    #[error("failed to evict archive {name}")]
    Eviction {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk {}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to parse configuration")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl Error {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error means "the named archive does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ArchiveNotFound(_))
    }
}
