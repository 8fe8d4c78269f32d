//! The watch–match–transfer orchestrator
//!
//! Subscribes to create notifications on the watched directory, validates
//! trigger files, resolves matching volumes, and drives one cancellable
//! copy per destination. A later trigger for the same destination always
//! wins: the in-flight copy is superseded before the new one starts.

use crate::config::FlashConfig;
use crate::core::OperationRegistry;
use crate::error::{HexflashError, Result};
use crate::transfer::{FlashOutcome, FlashResult, TransferStrategy};
use crate::volume::{Volume, VolumeProvider};
use crate::watch::events::{self, TriggerEvent, TriggerKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Coordinates trigger events, volume matching, and copy lifecycle.
///
/// The orchestrator is the only writer of the operation registry; copy
/// tasks only clear entries they still own. Every flash attempt is
/// reported on the results channel, one `FlashResult` per destination.
pub struct Orchestrator {
    config: FlashConfig,
    volumes: Arc<dyn VolumeProvider>,
    strategy: Arc<dyn TransferStrategy>,
    registry: Arc<OperationRegistry>,
    results: mpsc::UnboundedSender<FlashResult>,
}

impl Orchestrator {
    /// Create an orchestrator reporting flash attempts on the returned
    /// channel.
    pub fn new(
        config: FlashConfig,
        volumes: Arc<dyn VolumeProvider>,
        strategy: Arc<dyn TransferStrategy>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<FlashResult>) {
        let (results, receiver) = mpsc::unbounded_channel();
        let orchestrator = Arc::new(Self {
            config,
            volumes,
            strategy,
            registry: Arc::new(OperationRegistry::new()),
            results,
        });
        (orchestrator, receiver)
    }

    /// Subscribe to the watched directory and start dispatching events.
    ///
    /// This is the only fatal path: a directory that cannot be watched
    /// aborts startup. Everything after this point is contained at
    /// single-destination granularity.
    pub fn start(self: &Arc<Self>) -> Result<WatcherHandle> {
        let dir = self.config.watch_dir.clone();
        if !dir.is_dir() {
            return Err(HexflashError::NotFound(dir));
        }

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                // A dropped receiver means we are shutting down.
                let _ = event_tx.send(res);
            })?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|source| HexflashError::Watch {
                path: dir.clone(),
                source,
            })?;

        info!("Monitoring: {}", dir.display());

        let orchestrator = Arc::clone(self);
        let dispatch = tokio::spawn(async move {
            while let Some(res) = event_rx.recv().await {
                match res {
                    Ok(event) => {
                        for trigger in events::from_notify(event) {
                            orchestrator.handle_event(trigger).await;
                        }
                    }
                    Err(err) => warn!("watch backend error: {err}"),
                }
            }
            debug!("event dispatch finished");
        });

        Ok(WatcherHandle {
            watcher: Some(watcher),
            dispatch,
            watch_dir: dir,
        })
    }

    /// Process one trigger event: filter, match volumes, launch copies.
    ///
    /// Returns once the copies are spawned; their completion is reported
    /// asynchronously on the results channel. Volumes are enumerated
    /// fresh on every accepted trigger.
    pub async fn handle_event(&self, event: TriggerEvent) {
        if event.kind != TriggerKind::Created {
            return;
        }
        if !self.has_trigger_suffix(&event.path) {
            return;
        }
        // Async metadata keeps the dispatch loop responsive on slow media.
        match tokio::fs::metadata(&event.path).await {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {}
            // Zero bytes means a write still in progress, not a trigger yet.
            _ => {
                debug!(
                    "ignoring {}: empty or not a regular file",
                    event.path.display()
                );
                return;
            }
        }

        info!("Found: {}", event.path.display());

        let matches = self.volumes.find_by_label(&self.config.target_label);
        if matches.is_empty() {
            debug!("no mounted volume labeled '{}'", self.config.target_label);
            return;
        }

        for volume in matches {
            self.flash_volume(&event.path, volume);
        }
    }

    /// Number of copies currently in flight
    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }

    fn has_trigger_suffix(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&self.config.trigger_suffix))
    }

    /// Launch one copy to one matched volume.
    ///
    /// Never propagates: every outcome for this destination lands in its
    /// own `FlashResult`, so one device's failure cannot affect the
    /// others matched by the same trigger.
    fn flash_volume(&self, source: &Path, volume: Volume) {
        let Some(root) = volume.mount_root else {
            if volume.can_mount {
                warn!(
                    "volume '{}' is not mounted; an explicit mount step is required, skipping",
                    volume.label
                );
            } else {
                warn!(
                    "volume '{}' has no mount point and cannot be mounted, skipping",
                    volume.label
                );
            }
            return;
        };

        let destination = root.join(&self.config.firmware_name);
        // Supersedes any copy already in flight for this destination.
        let token = self.registry.begin(&root);

        let source = source.to_path_buf();
        let strategy = Arc::clone(&self.strategy);
        let registry = Arc::clone(&self.registry);
        let results = self.results.clone();

        tokio::spawn(async move {
            let result = strategy.copy(&source, &destination, &token).await;
            registry.clear_if_owned(&root, &token);

            match result.outcome {
                FlashOutcome::Success => info!(
                    "Flashed: {} ({})",
                    result.destination.display(),
                    humansize::format_size(result.bytes_copied, humansize::BINARY)
                ),
                FlashOutcome::Cancelled => info!(
                    "Superseded copy to {} stopped",
                    result.destination.display()
                ),
                FlashOutcome::Failed => warn!(
                    "Failed to copy to {}: {}",
                    result.destination.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                ),
            }

            // The receiver may already be gone during shutdown.
            let _ = results.send(result);
        });
    }
}

/// Keeps the directory subscription and dispatch task alive.
///
/// Dropping the handle ends watching. In-flight copies are abandoned on
/// shutdown; the firmware slot is overwritten by the next flash anyway.
pub struct WatcherHandle {
    watcher: Option<RecommendedWatcher>,
    dispatch: tokio::task::JoinHandle<()>,
    watch_dir: PathBuf,
}

impl WatcherHandle {
    /// Directory this handle is watching
    pub fn watch_dir(&self) -> &Path {
        &self.watch_dir
    }

    /// Stop watching and release the subscription
    pub fn stop(mut self) {
        self.watcher.take();
        self.dispatch.abort();
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.dispatch.abort();
    }
}
