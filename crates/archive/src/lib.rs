//! Snapshot storage for savewarden
//!
//! This crate provides:
//! - `ArchiveStore`: copy-on-trigger snapshots, bounded retention, restore
//! - `Archive`: one timestamped snapshot directory
//! - `RetentionPolicy`: how many snapshots survive each archive

pub mod retention;
pub mod snapshot;
pub mod store;

// Re-exports
pub use retention::RetentionPolicy;
pub use snapshot::Archive;
pub use store::{ArchiveStore, EvictionReport, RestoreReport};

/// Result type for archive operations
pub type Result<T> = savewarden_core::Result<T>;
