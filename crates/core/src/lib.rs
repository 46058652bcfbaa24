//! Core types for savewarden
//!
//! This crate provides:
//! - Watch configuration (TOML-backed) and trigger patterns
//! - Timestamped archive names (`YYYYMMDD_HHMMSS`)
//! - Recursive tree copy used by snapshot and restore
//! - The shared error type

pub mod config;
pub mod copy;
pub mod error;
pub mod name;

// Re-exports
pub use config::{RoundRule, TriggerPatterns, WatchConfig};
pub use copy::{copy_tree, CopyMode, CopyStats};
pub use error::{Error, Result};
pub use name::ArchiveName;
