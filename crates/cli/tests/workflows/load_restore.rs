//! Snapshot, list and load through the CLI binary

use crate::common::SaveFixture;
use crate::sw;
use anyhow::Result;

#[test]
fn test_snapshot_then_load_roundtrip() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let expected = fixture.save_tree();

    let result = sw!(fixture.config_path(), "snapshot").assert_success()?;
    let name = result
        .parse_archive_name()
        .expect("snapshot should print the archive name");
    assert_eq!(fixture.archive_names(), vec![name.clone()]);

    fixture.write("global.json", "{\"day\":99}")?;
    fixture.write("round/round_1.json", "{\"round\":99}")?;

    sw!(fixture.config_path(), "load", &name).assert_success()?;

    assert_eq!(fixture.save_tree(), expected);
    Ok(())
}

#[test]
fn test_load_keeps_files_not_in_archive() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let result = sw!(fixture.config_path(), "snapshot").assert_success()?;
    let name = result.parse_archive_name().expect("archive name");

    fixture.write("round/round_2.json", "{\"round\":2}")?;
    sw!(fixture.config_path(), "load", &name).assert_success()?;

    assert_eq!(fixture.read("round/round_2.json")?, "{\"round\":2}");
    assert_eq!(fixture.read("global.json")?, "{\"day\":1}");
    Ok(())
}

#[test]
fn test_load_missing_archive_fails_without_changes() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let before = fixture.save_tree();

    let result = sw!(fixture.config_path(), "load", "20990101_000000").assert_failure()?;

    assert!(result.contains_stdout("Archive does not exist"));
    assert_eq!(fixture.save_tree(), before);
    Ok(())
}

#[test]
fn test_load_without_watch_path() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let result = sw!(fixture.config_path(), "snapshot").assert_success()?;
    let name = result.parse_archive_name().expect("archive name");

    sw!(fixture.config_path(), "config", "set", "watch_path", "").assert_success()?;
    fixture.write("global.json", "{\"day\":5}")?;

    sw!(fixture.config_path(), "load", &name).assert_success()?;

    assert_eq!(fixture.read("global.json")?, "{\"day\":1}");
    Ok(())
}

#[test]
fn test_list_json_oldest_first() -> Result<()> {
    let fixture = SaveFixture::new()?;
    for name in ["20250101_000002", "20250101_000000", "20250101_000001"] {
        std::fs::create_dir_all(fixture.archive_root().join(name))?;
    }
    std::fs::create_dir_all(fixture.archive_root().join("manual-copy"))?;

    let result = sw!(fixture.config_path(), "list", "--json").assert_success()?;
    let entries: serde_json::Value = serde_json::from_str(&result.stdout)?;
    let names: Vec<&str> = entries
        .as_array()
        .expect("json array")
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();

    assert_eq!(names, ["20250101_000000", "20250101_000001", "20250101_000002"]);
    Ok(())
}

#[test]
fn test_snapshot_applies_retention() -> Result<()> {
    let fixture = SaveFixture::new()?;
    for name in ["20200101_000000", "20200101_000001", "20200101_000002"] {
        std::fs::create_dir_all(fixture.archive_root().join(name))?;
    }

    let result = sw!(fixture.config_path(), "snapshot", "--max-archives", "2").assert_success()?;
    let name = result.parse_archive_name().expect("archive name");

    assert_eq!(
        fixture.archive_names(),
        vec!["20200101_000002".to_string(), name]
    );
    Ok(())
}
