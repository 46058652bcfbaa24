//! CLI command execution helpers with automatic timing
//!
//! Wraps the `savewarden` binary. Every invocation gets `--config` pointed
//! at the fixture's config file so tests never read the user's real one.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

/// CLI command builder with timing
pub struct SwCommand {
    binary_path: PathBuf,
    config_path: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl SwCommand {
    /// Create a new command bound to a config file
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_savewarden")),
            config_path: config_path.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::from([("RUST_LOG".to_string(), "warn".to_string())]),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    #[allow(dead_code)]
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Execute command and return result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let output = Command::new(&self.binary_path)
            .arg("--config")
            .arg(&self.config_path)
            .args(&self.args)
            .envs(&self.env)
            .output()
            .context("Failed to execute command")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// First archive name (`YYYYMMDD_HHMMSS`) printed on stdout
    pub fn parse_archive_name(&self) -> Option<String> {
        self.stdout.lines().find_map(extract_archive_name)
    }
}

/// Extract a `YYYYMMDD_HHMMSS` token from a line of text
pub fn extract_archive_name(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    for (i, window) in bytes.windows(15).enumerate() {
        let shaped = window.iter().enumerate().all(|(j, b)| match j {
            8 => *b == b'_',
            _ => b.is_ascii_digit(),
        });
        let bounded_left = i == 0 || !bytes[i - 1].is_ascii_digit();
        let bounded_right = bytes.get(i + 15).map_or(true, |b| !b.is_ascii_digit());
        if shaped && bounded_left && bounded_right {
            return Some(line[i..i + 15].to_string());
        }
    }
    None
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// sw!(fixture.config_path(), "snapshot").assert_success()?;
/// sw!(fixture.config_path(), "load", &name).assert_success()?;
/// ```
#[macro_export]
macro_rules! sw {
    ($config:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::SwCommand::new($config);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_name_extraction() {
        assert_eq!(
            extract_archive_name("✓ Archive saved: 20250314_213005"),
            Some("20250314_213005".to_string())
        );
        assert_eq!(extract_archive_name("no archive here"), None);
        assert_eq!(extract_archive_name("120250314_213005"), None);
    }
}
