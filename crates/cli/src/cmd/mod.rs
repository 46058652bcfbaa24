//! CLI command implementations

pub mod config;
pub mod list;
pub mod load;
pub mod snapshot;
pub mod watch;
