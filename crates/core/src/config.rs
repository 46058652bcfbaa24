//! Watch configuration
//!
//! Stored as TOML, by default at `<config_dir>/savewarden/config.toml`:
//!
//! ```toml
//! watch_path = "C:/Users/me/AppData/LocalLow/Double Cross/Sultan's Game/SAVE/7656"
//! source_path = "C:/Users/me/AppData/LocalLow/Double Cross/Sultan's Game/SAVE/7656"
//! archive_root = "D:/saves/archives"
//! poll_interval_secs = 1.0
//! max_archives = 20
//! auto_start = false
//!
//! [trigger]
//! marker_file = "global.json"
//!
//! [trigger.round_rule]
//! kind = "subdir"
//! dir = "round"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "savewarden";
const CONFIG_FILE: &str = "config.toml";

/// Accepted range for `poll_interval_secs`
pub const MIN_POLL_INTERVAL_SECS: f64 = 0.001;
pub const MAX_POLL_INTERVAL_SECS: f64 = 3600.0;
const DEFAULT_POLL_INTERVAL_SECS: f64 = 1.0;

/// Everything one watch session needs. Immutable for the lifetime of an orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Directory tree observed for save events
    pub watch_path: PathBuf,
    /// Directory copied into each snapshot (and restored into)
    pub source_path: PathBuf,
    /// Directory holding one subdirectory per snapshot
    pub archive_root: PathBuf,
    /// Liveness tick of the listener; does not affect detection latency
    pub poll_interval_secs: f64,
    /// Snapshots kept after each archive; 0 or negative keeps none
    pub max_archives: i64,
    /// Start watching right after a successful load
    pub auto_start: bool,
    pub trigger: TriggerPatterns,
}

/// File patterns that make up the two-phase "save completed" signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerPatterns {
    /// File name written first (end-of-round state)
    pub marker_file: String,
    /// Which `.json` files count as the round file written second
    pub round_rule: RoundRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundRule {
    /// `.json` files anywhere below `<watch_root>/<dir>`
    Subdir { dir: String },
    /// `.json` files with a path component (below the watch root) starting with `prefix`
    FilePrefix { prefix: String },
}

impl Default for TriggerPatterns {
    fn default() -> Self {
        Self {
            marker_file: "global.json".to_string(),
            round_rule: RoundRule::Subdir {
                dir: "round".to_string(),
            },
        }
    }
}

impl TriggerPatterns {
    /// `last_round_end.json` followed by any `round_*` json file
    pub fn round_end() -> Self {
        Self {
            marker_file: "last_round_end.json".to_string(),
            round_rule: RoundRule::FilePrefix {
                prefix: "round_".to_string(),
            },
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        let save_dir = discover_game_save_dir().unwrap_or_default();
        Self {
            watch_path: save_dir.clone(),
            source_path: save_dir,
            archive_root: default_archive_root(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_archives: 20,
            auto_start: false,
            trigger: TriggerPatterns::default(),
        }
    }
}

impl WatchConfig {
    /// Config where the watched tree is also the tree being archived
    pub fn new(watch_path: impl Into<PathBuf>, archive_root: impl Into<PathBuf>) -> Self {
        let watch_path = watch_path.into();
        Self {
            source_path: watch_path.clone(),
            watch_path,
            archive_root: archive_root.into(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_archives: 20,
            auto_start: false,
            trigger: TriggerPatterns::default(),
        }
    }

    /// Listener tick as a `Duration`, clamped to the accepted range
    pub fn poll_interval(&self) -> Duration {
        let secs = if self.poll_interval_secs.is_finite() {
            self.poll_interval_secs
                .clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS)
        } else {
            DEFAULT_POLL_INTERVAL_SECS
        };
        Duration::from_secs_f64(secs)
    }

    /// Check value ranges and path relationships
    pub fn validate(&self) -> Result<()> {
        self.validate_settings()?;

        for (key, path) in [
            ("watch_path", &self.watch_path),
            ("source_path", &self.source_path),
            ("archive_root", &self.archive_root),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(format!("{key} is not set")));
            }
        }

        let root = resolve(&self.archive_root);
        for (key, path) in [("source_path", &self.source_path), ("watch_path", &self.watch_path)] {
            if root.starts_with(resolve(path)) {
                return Err(Error::InvalidConfig(format!(
                    "archive_root {} must not be inside {key} {}",
                    self.archive_root.display(),
                    path.display()
                )));
            }
        }

        Ok(())
    }

    /// Check the values that do not depend on paths being set
    ///
    /// Used on its own when editing a config that has no paths yet.
    pub fn validate_settings(&self) -> Result<()> {
        let secs = self.poll_interval_secs;
        if !(MIN_POLL_INTERVAL_SECS..=MAX_POLL_INTERVAL_SECS).contains(&secs) {
            return Err(Error::InvalidConfig(format!(
                "poll_interval_secs must be between {} and {} (got {})",
                MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS, secs
            )));
        }

        if self.trigger.marker_file.is_empty() {
            return Err(Error::InvalidConfig("trigger.marker_file is empty".to_string()));
        }
        let pattern = match &self.trigger.round_rule {
            RoundRule::Subdir { dir } => dir,
            RoundRule::FilePrefix { prefix } => prefix,
        };
        if pattern.is_empty() {
            return Err(Error::InvalidConfig("trigger.round_rule pattern is empty".to_string()));
        }

        Ok(())
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| Error::io(path, e))
    }

    /// Write the default configuration if nothing exists at `path` yet
    pub fn init_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save(path)?;
        Ok(true)
    }
}

/// Default location of the persisted configuration
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Default directory for snapshots
pub fn default_archive_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join("archives"))
        .unwrap_or_else(|| PathBuf::from("archives"))
}

/// Locate the game's `SAVE` folder under `Local` or `LocalLow`
pub fn discover_game_save_dir() -> Option<PathBuf> {
    let local = dirs::data_local_dir()?;
    let appdata = if local.ends_with("Local") {
        local.parent()?.to_path_buf()
    } else {
        local
    };

    ["Local", "LocalLow"]
        .iter()
        .map(|base| {
            appdata
                .join(base)
                .join("Double Cross")
                .join("Sultan's Game")
                .join("SAVE")
        })
        .find(|candidate| candidate.is_dir())
}

/// Canonicalize the longest existing ancestor so not-yet-created paths still compare
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => resolve(parent).join(name),
        _ => path.to_path_buf(),
    }
}
