//! Restore an archive into the save folder

use crate::util;
use anyhow::{Context, Result};
use cli_lib::{DaemonError, Orchestrator};
use owo_colors::OwoColorize;
use savewarden_core::WatchConfig;

pub async fn run(mut config: WatchConfig, name: &str, watch_after: bool) -> Result<()> {
    // Restore only reads the source tree; an unset watch path falls back to it
    if config.watch_path.as_os_str().is_empty() {
        config.watch_path = config.source_path.clone();
    }
    let orchestrator = Orchestrator::new(config).context("Invalid configuration")?;

    println!(
        "Loading archive {} from {}",
        name.yellow(),
        orchestrator.config().archive_root.display()
    );

    match orchestrator.restore(name) {
        Ok(report) => {
            println!(
                "{} Restored {} files ({}) into {}",
                "✓".green(),
                report.stats.files,
                util::format_size(report.stats.bytes),
                orchestrator.config().source_path.display()
            );
        }
        Err(DaemonError::Archive(e)) if e.is_not_found() => {
            println!("{}", "Archive does not exist.".red());
            println!("  {}", "Tip: run 'savewarden list' to see available archives".dimmed());
            anyhow::bail!("Archive not found: {}", name);
        }
        Err(e) => return Err(e).context("Restore failed"),
    }

    if watch_after {
        println!();
        super::watch::serve(orchestrator).await?;
    }

    Ok(())
}
