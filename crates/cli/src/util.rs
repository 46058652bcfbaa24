//! Shared utilities for CLI commands

use crate::{PathArgs, TriggerArgs};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use savewarden_core::config::config_file_path;
use savewarden_core::{RoundRule, WatchConfig};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the tracing subscriber
///
/// Logs go to stderr (stdout is reserved for command output). With
/// `log_dir`, a daily rolling file is written too; keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "savewarden.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr).init();
            Ok(None)
        }
    }
}

/// Explicit `--config` path, or the per-user default
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => config_file_path().context("Could not determine config file path"),
    }
}

pub fn load_config(path: &Path) -> Result<WatchConfig> {
    WatchConfig::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Apply command-line path overrides
///
/// A watch path given without a source path is also used as the source,
/// matching the common case where the save folder is both.
pub fn apply_paths(config: &mut WatchConfig, paths: &PathArgs) {
    if let Some(watch) = &paths.watch_path {
        config.watch_path = watch.clone();
        if paths.source_path.is_none() {
            config.source_path = watch.clone();
        }
    }
    if let Some(source) = &paths.source_path {
        config.source_path = source.clone();
    }
    if let Some(root) = &paths.archive_root {
        config.archive_root = root.clone();
    }
}

pub fn apply_trigger(config: &mut WatchConfig, trigger: &TriggerArgs) {
    if let Some(marker) = &trigger.marker {
        config.trigger.marker_file = marker.clone();
    }
    if let Some(dir) = &trigger.round_dir {
        config.trigger.round_rule = RoundRule::Subdir { dir: dir.clone() };
    }
    if let Some(prefix) = &trigger.round_prefix {
        config.trigger.round_rule = RoundRule::FilePrefix {
            prefix: prefix.clone(),
        };
    }
}

/// Format a local timestamp as relative time ("2 hours ago")
pub fn format_relative_time(at: NaiveDateTime) -> String {
    let seconds = (Local::now().naive_local() - at).num_seconds();

    if seconds < 0 {
        "in the future".to_string()
    } else if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
