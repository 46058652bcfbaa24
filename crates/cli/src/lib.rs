//! Library side of the savewarden CLI
//!
//! Exposes the orchestrator so integration tests and other front-ends can
//! run the watch engine without going through argument parsing.

pub mod daemon;

pub use daemon::{DaemonError, Orchestrator, Pipeline, WatchState};
