//! Config command and argument handling

use crate::common::SaveFixture;
use crate::sw;
use anyhow::Result;

#[test]
fn test_config_set_then_get() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let config = fixture.config_path();

    sw!(config, "config", "set", "max_archives", "7").assert_success()?;
    let result = sw!(config, "config", "get", "max_archives").assert_success()?;
    assert_eq!(result.stdout.trim(), "7");

    sw!(config, "config", "set", "trigger.round_prefix", "round_").assert_success()?;
    let result = sw!(config, "config", "get", "trigger.round_prefix").assert_success()?;
    assert_eq!(result.stdout.trim(), "round_");
    let result = sw!(config, "config", "get", "trigger.round_dir").assert_success()?;
    assert_eq!(result.stdout.trim(), "");

    // Untouched keys survive the rewrite
    let result = sw!(config, "config", "get", "source_path").assert_success()?;
    assert_eq!(result.stdout.trim(), fixture.save_dir().display().to_string());
    Ok(())
}

#[test]
fn test_config_rejects_bad_values() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let config = fixture.config_path();

    sw!(config, "config", "set", "poll_interval_secs", "0").assert_failure()?;
    sw!(config, "config", "set", "poll_interval_secs", "soon").assert_failure()?;
    sw!(config, "config", "set", "poll_interval_secs", "1e-12").assert_failure()?;
    sw!(config, "config", "set", "poll_interval_secs", "1e20").assert_failure()?;
    sw!(config, "config", "set", "trigger.marker_file", "").assert_failure()?;
    sw!(config, "config", "set", "auto_start", "maybe").assert_failure()?;
    sw!(config, "config", "set", "retain_hours", "1").assert_failure()?;
    sw!(config, "config", "get", "retain_hours").assert_failure()?;

    let result = sw!(config, "config", "get", "poll_interval_secs").assert_success()?;
    assert_eq!(result.stdout.trim(), "0.05");
    Ok(())
}

#[test]
fn test_config_path_create() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let fresh = fixture.archive_root().with_file_name("fresh").join("config.toml");

    let result = sw!(&fresh, "config", "path").assert_success()?;
    assert!(result.contains_stdout("does not exist"));
    assert!(!fresh.exists());

    sw!(&fresh, "config", "path", "--create").assert_success()?;
    assert!(fresh.is_file());
    Ok(())
}

#[test]
fn test_snapshot_with_missing_source_fails() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let missing = fixture.save_dir().join("nope");

    sw!(
        fixture.config_path(),
        "snapshot",
        "--source-path",
        missing.to_str().expect("utf-8 path")
    )
    .assert_failure()?;

    assert!(fixture.archive_names().is_empty());
    Ok(())
}

#[test]
fn test_watch_rejects_archive_root_inside_save() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let inside = fixture.save_dir().join("archives");

    sw!(
        fixture.config_path(),
        "watch",
        "--archive-root",
        inside.to_str().expect("utf-8 path")
    )
    .assert_failure()?;
    Ok(())
}
