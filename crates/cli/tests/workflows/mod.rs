//! Workflow integration tests
//!
//! Complete workflows that exercise the live watcher and multiple CLI
//! commands against one save tree.

pub mod cli_commands;
pub mod load_restore;
pub mod trigger_pipeline;
