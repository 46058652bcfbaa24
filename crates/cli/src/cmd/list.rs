//! List archives

use crate::util;
use anyhow::{Context, Result};
use archive::ArchiveStore;
use owo_colors::OwoColorize;
use savewarden_core::WatchConfig;

pub async fn run(config: &WatchConfig, json: bool) -> Result<()> {
    let store = ArchiveStore::from_config(config);
    let archives = store.list().context("Failed to list archives")?;

    if json {
        let mut entries = Vec::with_capacity(archives.len());
        for archive in &archives {
            entries.push(serde_json::json!({
                "name": archive.name().to_string(),
                "path": archive.path(),
                "created": archive.name().datetime().format("%Y-%m-%dT%H:%M:%S").to_string(),
                "size_bytes": archive.size()?,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Archives".bold());
    println!("{}: {}\n", "Location".dimmed(), store.root().display().dimmed());

    if archives.is_empty() {
        println!("  {}", "No archives yet".dimmed());
        return Ok(());
    }

    for archive in &archives {
        let at = archive.name().datetime();
        println!(
            "  {}  {}  {:>10}  {}",
            archive.name().to_string().yellow(),
            at.format("%Y-%m-%d %H:%M:%S"),
            util::format_size(archive.size()?),
            util::format_relative_time(at).dimmed()
        );
    }

    println!();
    println!("{} archives (max {})", archives.len(), config.max_archives);

    Ok(())
}
