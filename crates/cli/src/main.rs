//! savewarden CLI

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod util;

/// savewarden - automatic save snapshots for Sultan's Game
#[derive(Parser)]
#[command(name = "savewarden")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/savewarden/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Path overrides shared by every command that touches the save tree
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Directory to watch for save events
    #[arg(long)]
    pub watch_path: Option<PathBuf>,
    /// Directory copied into each archive (and restored into)
    #[arg(long)]
    pub source_path: Option<PathBuf>,
    /// Directory holding the archives
    #[arg(long)]
    pub archive_root: Option<PathBuf>,
}

/// Trigger pattern overrides
#[derive(Args, Debug, Clone, Default)]
pub struct TriggerArgs {
    /// File name of the end-of-round marker (e.g. global.json)
    #[arg(long)]
    pub marker: Option<String>,
    /// Round files are .json files under this subdirectory of the watch path
    #[arg(long, conflicts_with = "round_prefix")]
    pub round_dir: Option<String>,
    /// Round files are .json files with a path component starting with this prefix
    #[arg(long)]
    pub round_prefix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the save folder and archive after every completed save
    Watch {
        #[command(flatten)]
        paths: PathArgs,
        #[command(flatten)]
        trigger: TriggerArgs,
        /// Listener tick in seconds
        #[arg(long)]
        interval: Option<f64>,
        /// Number of archives to keep
        #[arg(long, allow_negative_numbers = true)]
        max_archives: Option<i64>,
        /// Also write logs to daily files in this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,
        /// Persist the effective configuration before watching
        #[arg(long)]
        save_config: bool,
    },
    /// Restore an archive into the save folder
    Load {
        /// Archive name (YYYYMMDD_HHMMSS)
        name: String,
        #[command(flatten)]
        paths: PathArgs,
        /// Start watching after the restore
        #[arg(long, conflicts_with = "no_watch")]
        watch: bool,
        /// Exit after the restore even if auto_start is set
        #[arg(long)]
        no_watch: bool,
    },
    /// List archives, oldest first
    List {
        #[command(flatten)]
        paths: PathArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Archive the save folder right now
    Snapshot {
        #[command(flatten)]
        paths: PathArgs,
        /// Number of archives to keep
        #[arg(long, allow_negative_numbers = true)]
        max_archives: Option<i64>,
    },
    /// View or edit the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show all configuration values
    List,
    /// Print one configuration value
    Get {
        key: String,
    },
    /// Set one configuration value
    Set {
        key: String,
        value: String,
    },
    /// Print the configuration file path
    Path {
        /// Write the default configuration if the file does not exist
        #[arg(long)]
        create: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Watch { log_dir, .. } => log_dir.clone(),
        _ => None,
    };
    let _log_guard = util::init_tracing(log_dir.as_deref())?;

    let config_path = util::config_path(cli.config)?;

    match cli.command {
        Commands::Watch {
            paths,
            trigger,
            interval,
            max_archives,
            log_dir: _,
            save_config,
        } => {
            let mut config = util::load_config(&config_path)?;
            util::apply_paths(&mut config, &paths);
            util::apply_trigger(&mut config, &trigger);
            if let Some(secs) = interval {
                config.poll_interval_secs = secs;
            }
            if let Some(max) = max_archives {
                config.max_archives = max;
            }
            let save_to = save_config.then_some(config_path.as_path());
            cmd::watch::run(config, save_to).await
        }
        Commands::Load {
            name,
            paths,
            watch,
            no_watch,
        } => {
            let mut config = util::load_config(&config_path)?;
            util::apply_paths(&mut config, &paths);
            let watch_after = watch || (config.auto_start && !no_watch);
            cmd::load::run(config, &name, watch_after).await
        }
        Commands::List { paths, json } => {
            let mut config = util::load_config(&config_path)?;
            util::apply_paths(&mut config, &paths);
            cmd::list::run(&config, json).await
        }
        Commands::Snapshot {
            paths,
            max_archives,
        } => {
            let mut config = util::load_config(&config_path)?;
            util::apply_paths(&mut config, &paths);
            if let Some(max) = max_archives {
                config.max_archives = max;
            }
            cmd::snapshot::run(&config).await
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(&config_path).await,
            ConfigCommands::Get { key } => cmd::config::run_get(&config_path, &key).await,
            ConfigCommands::Set { key, value } => {
                cmd::config::run_set(&config_path, &key, &value).await
            }
            ConfigCommands::Path { create } => cmd::config::run_path(&config_path, create).await,
        },
    }
}
