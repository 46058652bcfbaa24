//! Live watch pipeline: marker, then round file, then one archive

use crate::common::SaveFixture;
use anyhow::Result;
use cli_lib::{Orchestrator, WatchState};
use std::thread;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(5);
const SETTLE: Duration = Duration::from_millis(300);

/// Poll until `count` archives exist or the timeout expires
fn wait_for_archives(fixture: &SaveFixture, count: usize) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if fixture.archive_names().len() >= count {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    false
}

/// Marker write followed by a round write, with a gap so the events arrive in order
fn complete_save(fixture: &SaveFixture, round: u32) -> Result<()> {
    fixture.write("global.json", &format!("{{\"day\":{round}}}"))?;
    thread::sleep(Duration::from_millis(100));
    fixture.write(
        &format!("round/round_{round}.json"),
        &format!("{{\"round\":{round}}}"),
    )?;
    Ok(())
}

#[test]
fn test_marker_then_round_archives_once() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let mut orchestrator = Orchestrator::new(fixture.config())?;
    orchestrator.start()?;
    assert_eq!(orchestrator.state(), WatchState::Watching);
    thread::sleep(SETTLE);

    complete_save(&fixture, 2)?;

    assert!(wait_for_archives(&fixture, 1), "no archive after a complete save");
    thread::sleep(SETTLE);
    let names = fixture.archive_names();
    assert_eq!(names.len(), 1, "expected one archive, got {names:?}");

    // The archive holds the tree as of the trigger
    let archived = fixture.archive_root().join(&names[0]);
    assert!(archived.join("global.json").is_file());
    assert!(archived.join("round/round_1.json").is_file());

    orchestrator.stop()?;
    assert_eq!(orchestrator.state(), WatchState::Stopped);
    Ok(())
}

#[test]
fn test_round_write_without_marker_does_nothing() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let mut orchestrator = Orchestrator::new(fixture.config())?;
    orchestrator.start()?;
    thread::sleep(SETTLE);

    fixture.write("round/round_2.json", "{\"round\":2}")?;
    fixture.write("notes.txt", "unrelated")?;
    thread::sleep(Duration::from_secs(1));

    assert!(fixture.archive_names().is_empty());
    orchestrator.stop()?;
    Ok(())
}

#[test]
fn test_no_archives_after_stop() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let mut orchestrator = Orchestrator::new(fixture.config())?;
    orchestrator.start()?;
    thread::sleep(SETTLE);
    orchestrator.stop()?;

    complete_save(&fixture, 2)?;
    thread::sleep(Duration::from_secs(1));

    assert!(fixture.archive_names().is_empty());
    Ok(())
}

#[test]
fn test_restart_after_stop() -> Result<()> {
    let fixture = SaveFixture::new()?;
    let mut orchestrator = Orchestrator::new(fixture.config())?;

    orchestrator.start()?;
    orchestrator.stop()?;
    orchestrator.start()?;
    assert_eq!(orchestrator.state(), WatchState::Watching);
    thread::sleep(SETTLE);

    complete_save(&fixture, 3)?;
    assert!(wait_for_archives(&fixture, 1), "restarted watch did not archive");

    orchestrator.stop()?;
    Ok(())
}
