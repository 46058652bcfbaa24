//! Watch the save folder until interrupted

use anyhow::{Context, Result};
use cli_lib::{Orchestrator, WatchState};
use owo_colors::OwoColorize;
use savewarden_core::WatchConfig;
use std::path::Path;
use tracing::info;

pub async fn run(config: WatchConfig, save_to: Option<&Path>) -> Result<()> {
    // 1. Validate (and optionally persist) the effective configuration
    let orchestrator = Orchestrator::new(config).context("Invalid watch configuration")?;
    if let Some(path) = save_to {
        orchestrator
            .config()
            .save(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        println!("{} Saved configuration to {}", "✓".green(), path.display());
    }

    // 2. Watch until Ctrl+C
    serve(orchestrator).await
}

/// Start watching and block until Ctrl+C or a listener failure
pub async fn serve(mut orchestrator: Orchestrator) -> Result<()> {
    orchestrator.start().context("Failed to start watching")?;

    let config = orchestrator.config();
    println!(
        "{} Watching {}",
        "●".green(),
        config.watch_path.display().to_string().cyan()
    );
    println!("  Archives: {}", config.archive_root.display());
    println!("  Keeping:  {} most recent", config.max_archives);
    println!("  {}", "Press Ctrl+C to stop".dimmed());

    let waited = wait_for_interrupt(&mut orchestrator).await;
    let stopped = orchestrator.stop().context("Watch ended with an error");

    waited?;
    stopped?;

    println!("{} Stopped watching", "✓".green());
    Ok(())
}

/// Tick at the configured interval; return on Ctrl+C, fail if the listener died
async fn wait_for_interrupt(orchestrator: &mut Orchestrator) -> Result<()> {
    let mut ticker = tokio::time::interval(orchestrator.config().poll_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res.context("Failed to listen for Ctrl+C")?;
                info!("Interrupt received");
                return Ok(());
            }
            _ = ticker.tick() => {
                if orchestrator.state() == WatchState::Stopped {
                    // The listener died on its own; stop() hands back its error
                    orchestrator.stop().context("Listener stopped unexpectedly")?;
                    anyhow::bail!("Listener stopped unexpectedly");
                }
            }
        }
    }
}
