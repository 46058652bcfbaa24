//! Configuration management command
//!
//! View and edit the persisted watch configuration.

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use savewarden_core::config::{MAX_POLL_INTERVAL_SECS, MIN_POLL_INTERVAL_SECS};
use savewarden_core::{RoundRule, WatchConfig};
use std::path::{Path, PathBuf};

const KEYS: &[&str] = &[
    "watch_path",
    "source_path",
    "archive_root",
    "poll_interval_secs",
    "max_archives",
    "auto_start",
    "trigger.marker_file",
    "trigger.round_dir",
    "trigger.round_prefix",
];

/// List all configuration values
pub async fn run_list(config_path: &Path) -> Result<()> {
    let config = util::load_config(config_path)?;

    println!("{}", "Configuration".bold());
    println!("{}: {}", "Location".dimmed(), config_path.display().dimmed());
    if !config_path.exists() {
        println!("{}", "(file does not exist; showing defaults)".dimmed());
    }
    println!();

    for key in KEYS {
        match lookup(&config, key) {
            Some(value) => println!("  {} = {}", key.cyan(), value),
            None => println!("  {} = {}", key.cyan(), "(unset)".dimmed()),
        }
    }

    println!("\n{}", "Notes:".bold());
    println!(
        "  poll_interval_secs: {}-{}",
        MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS
    );
    println!("  max_archives: 0 or negative keeps no archives");
    println!("  trigger.round_dir and trigger.round_prefix are exclusive; setting one replaces the other");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(config_path: &Path, key: &str) -> Result<()> {
    check_key(key)?;
    let config = util::load_config(config_path)?;

    // An unset round rule variant prints nothing
    if let Some(value) = lookup(&config, key) {
        println!("{}", value);
    }
    Ok(())
}

/// Set a configuration value
pub async fn run_set(config_path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = util::load_config(config_path)?;

    match key {
        "watch_path" => config.watch_path = PathBuf::from(value),
        "source_path" => config.source_path = PathBuf::from(value),
        "archive_root" => config.archive_root = PathBuf::from(value),
        "poll_interval_secs" => {
            config.poll_interval_secs = value
                .parse()
                .context("Invalid value: must be a number of seconds")?;
        }
        "max_archives" => {
            config.max_archives = value
                .parse()
                .context("Invalid value: must be an integer")?;
        }
        "auto_start" => {
            config.auto_start = value
                .parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "trigger.marker_file" => config.trigger.marker_file = value.to_string(),
        "trigger.round_dir" => {
            config.trigger.round_rule = RoundRule::Subdir {
                dir: value.to_string(),
            }
        }
        "trigger.round_prefix" => {
            config.trigger.round_rule = RoundRule::FilePrefix {
                prefix: value.to_string(),
            }
        }
        _ => check_key(key)?,
    }

    // Paths may legitimately be unset while editing
    config
        .validate_settings()
        .context("Invalid configuration value")?;

    config
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    println!(
        "{}",
        "Note: restart 'savewarden watch' for changes to take effect".yellow()
    );

    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(config_path: &Path, create: bool) -> Result<()> {
    if create && WatchConfig::init_if_missing(config_path)? {
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
        return Ok(());
    }

    println!("{}", config_path.display());
    if !config_path.exists() {
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

fn check_key(key: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}. Use 'savewarden config list' to see available keys.",
            key
        );
    }
    Ok(())
}

fn lookup(config: &WatchConfig, key: &str) -> Option<String> {
    let path = |p: &Path| (!p.as_os_str().is_empty()).then(|| p.display().to_string());
    match key {
        "watch_path" => path(config.watch_path.as_path()),
        "source_path" => path(config.source_path.as_path()),
        "archive_root" => path(config.archive_root.as_path()),
        "poll_interval_secs" => Some(config.poll_interval_secs.to_string()),
        "max_archives" => Some(config.max_archives.to_string()),
        "auto_start" => Some(config.auto_start.to_string()),
        "trigger.marker_file" => Some(config.trigger.marker_file.clone()),
        "trigger.round_dir" => match &config.trigger.round_rule {
            RoundRule::Subdir { dir } => Some(dir.clone()),
            RoundRule::FilePrefix { .. } => None,
        },
        "trigger.round_prefix" => match &config.trigger.round_rule {
            RoundRule::FilePrefix { prefix } => Some(prefix.clone()),
            RoundRule::Subdir { .. } => None,
        },
        _ => None,
    }
}
