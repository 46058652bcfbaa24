//! Watch lifecycle management
//!
//! Wires `EventSource` -> `TriggerStateMachine` -> `ArchiveStore`.
//!
//! One worker thread drains the event channel. Trigger evaluation and any
//! archive it fires run synchronously on that thread, so a long copy delays
//! (but never drops) the events queued behind it.

use archive::{Archive, ArchiveStore, RestoreReport};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use savewarden_core::WatchConfig;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use watcher::{
    ChangeEvent, Decision, EventSource, PathMatcher, SourceMessage, TriggerState,
    TriggerStateMachine, WatchError,
};

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error(transparent)]
    Archive(#[from] savewarden_core::Error),

    #[error("failed to spawn watch worker")]
    Spawn(#[source] io::Error),

    #[error("watch worker panicked")]
    WorkerPanicked,
}

/// Watch lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Stopped,
    Watching,
}

/// Trigger machine bound to the store it fires into
pub struct Pipeline {
    trigger: TriggerStateMachine,
    store: Arc<ArchiveStore>,
}

impl Pipeline {
    pub fn new(trigger: TriggerStateMachine, store: Arc<ArchiveStore>) -> Self {
        Self { trigger, store }
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger.state()
    }

    /// Process one event; returns the archive result when the trigger fired
    pub fn dispatch(&mut self, event: &ChangeEvent) -> Option<savewarden_core::Result<Archive>> {
        if self.trigger.observe(event) != Decision::Fire {
            return None;
        }

        let result = self.store.archive();
        if let Err(e) = &result {
            error!(error = %e, "Archive failed; trigger reset, waiting for next save");
        }
        Some(result)
    }
}

struct Session {
    source: EventSource,
    shutdown: Sender<()>,
    worker: JoinHandle<Result<u64, WatchError>>,
}

/// Owns one watch configuration, its archive store, and the listener
///
/// Used both by the blocking `watch` command and by start/stop-on-demand
/// callers. Configuration is fixed for the lifetime of the instance.
pub struct Orchestrator {
    config: WatchConfig,
    store: Arc<ArchiveStore>,
    session: Option<Session>,
}

impl Orchestrator {
    /// Validate `config` and build the archive store
    pub fn new(config: WatchConfig) -> Result<Self, DaemonError> {
        config.validate()?;
        let store = Arc::new(ArchiveStore::from_config(&config));
        Ok(Self {
            config,
            store,
            session: None,
        })
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Shared store; manual snapshots must go through this instance
    pub fn store(&self) -> &Arc<ArchiveStore> {
        &self.store
    }

    /// `Watching` while the worker is alive; a crashed listener reads as `Stopped`
    pub fn state(&self) -> WatchState {
        match &self.session {
            Some(session) if !session.worker.is_finished() => WatchState::Watching,
            _ => WatchState::Stopped,
        }
    }

    /// Start the listener. No-op with a warning if already watching.
    pub fn start(&mut self) -> Result<(), DaemonError> {
        if self.state() == WatchState::Watching {
            warn!("Already watching");
            return Ok(());
        }

        // Reap a session whose listener died on its own
        if self.session.is_some() {
            if let Err(e) = self.stop() {
                warn!(error = %e, "Previous watch session ended with an error");
            }
        }

        // 1. Both trees must exist before watching
        if !self.config.source_path.is_dir() {
            return Err(savewarden_core::Error::SourceUnavailable(self.config.source_path.clone()).into());
        }
        let root = self
            .config
            .watch_path
            .canonicalize()
            .map_err(|_| WatchError::TargetUnavailable(self.config.watch_path.clone()))?;

        // 2. Install the OS watch
        let source = EventSource::start(&root)?;

        // 3. Fresh trigger state per session
        let matcher = PathMatcher::new(&root, self.config.trigger.clone());
        let pipeline = Pipeline::new(TriggerStateMachine::new(matcher), Arc::clone(&self.store));

        // 4. Worker
        let events = source.subscribe();
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let tick = self.config.poll_interval();
        let worker = thread::Builder::new()
            .name("savewarden-watch".to_string())
            .spawn(move || run_worker(pipeline, events, shutdown_rx, tick))
            .map_err(DaemonError::Spawn)?;

        info!(
            watch = %root.display(),
            source = %self.config.source_path.display(),
            archives = %self.config.archive_root.display(),
            max_archives = self.config.max_archives,
            "Start watching"
        );

        self.session = Some(Session {
            source,
            shutdown: shutdown_tx,
            worker,
        });
        Ok(())
    }

    /// Stop the listener and wait for the worker to finish
    ///
    /// Safe to call when already stopped. Returns the listener error if the
    /// worker had died on its own.
    pub fn stop(&mut self) -> Result<(), DaemonError> {
        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                debug!("Stop requested while not watching");
                return Ok(());
            }
        };

        // The worker may already be gone; a closed channel is fine
        let _ = session.shutdown.send(());
        let outcome = session.worker.join();
        session.source.stop();

        match outcome {
            Ok(Ok(archived)) => {
                info!(archived, "Stop watching");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(DaemonError::WorkerPanicked),
        }
    }

    /// Restore a snapshot into the source tree
    ///
    /// Does not require stopping the watch, but restored files can look
    /// like a fresh save to a running listener.
    pub fn restore(&self, name: &str) -> Result<RestoreReport, DaemonError> {
        if self.state() == WatchState::Watching {
            warn!(archive = name, "Restoring while watching; restored files may trigger a new archive");
        }
        Ok(self.store.restore(name)?)
    }

    /// Take a snapshot outside the trigger path
    pub fn archive_now(&self) -> Result<Archive, DaemonError> {
        Ok(self.store.archive()?)
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "Watch ended with an error");
        }
    }
}

/// Worker loop: one event at a time, in arrival order
///
/// The tick only bounds how long the loop sleeps between checks; events
/// are handled as soon as they arrive.
fn run_worker(
    mut pipeline: Pipeline,
    events: Receiver<SourceMessage>,
    shutdown: Receiver<()>,
    tick: Duration,
) -> Result<u64, WatchError> {
    let mut archived = 0u64;

    loop {
        select! {
            recv(shutdown) -> _ => return Ok(archived),
            recv(events) -> msg => match msg {
                Ok(SourceMessage::Event(event)) => {
                    if let Some(Ok(_)) = pipeline.dispatch(&event) {
                        archived += 1;
                    }
                }
                Ok(SourceMessage::Failed(e)) => {
                    error!(error = %e, "Listener failed, watch stopped");
                    return Err(e);
                }
                Err(_) => {
                    error!("Listener channel closed, watch stopped");
                    return Err(WatchError::ListenerClosed);
                }
            },
            default(tick) => trace!(state = ?pipeline.trigger_state(), "idle"),
        }
    }
}
