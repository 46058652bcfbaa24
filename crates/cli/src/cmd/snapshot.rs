//! Archive the save folder immediately

use anyhow::{Context, Result};
use archive::ArchiveStore;
use owo_colors::OwoColorize;
use savewarden_core::WatchConfig;

pub async fn run(config: &WatchConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let store = ArchiveStore::from_config(config);
    let archive = store.archive().context("Failed to create archive")?;

    println!(
        "{} Archive saved: {}",
        "✓".green(),
        archive.name().to_string().yellow()
    );
    println!("  {}", archive.path().display().to_string().dimmed());

    let count = store.list()?.len();
    println!("  {} archives kept (max {})", count, config.max_archives);

    Ok(())
}
