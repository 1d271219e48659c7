// src/watch/notify_backend.rs

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result, anyhow};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::types::WatchId;
use crate::watch::backend::WatchBackend;
use crate::watch::path_utils::{WatchRegistry, translate};

/// Production [`WatchBackend`] built on one `notify::RecommendedWatcher`.
///
/// Every subscription is a non-recursive watch on a single directory.
/// Events are translated on notify's callback thread and pushed into the
/// runtime channel in the order notify delivers them.
///
/// Lock order: `watcher` may be held while notify's event thread runs the
/// callback, so the callback only ever takes `registry`, and `registry` is
/// never held across a call into `watcher`.
pub struct NotifyWatchBackend {
    watcher: Mutex<RecommendedWatcher>,
    registry: Arc<Mutex<WatchRegistry>>,
}

impl std::fmt::Debug for NotifyWatchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyWatchBackend").finish_non_exhaustive()
    }
}

impl NotifyWatchBackend {
    pub fn new(runtime_tx: mpsc::UnboundedSender<RuntimeEvent>) -> Result<Self> {
        let registry = Arc::new(Mutex::new(WatchRegistry::new()));

        let watcher = RecommendedWatcher::new(
            {
                let registry = Arc::clone(&registry);
                move |res: notify::Result<Event>| match res {
                    Ok(event) => {
                        let events = {
                            let registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
                            translate(&event, &registry)
                        };
                        for fs_event in events {
                            if runtime_tx.send(RuntimeEvent::Fs(fs_event)).is_err() {
                                debug!("runtime channel closed; dropping watch event");
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, paths = ?err.paths, "file watch error");
                    }
                }
            },
            Config::default(),
        )
        .context("creating filesystem watcher")?;

        Ok(Self {
            watcher: Mutex::new(watcher),
            registry,
        })
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, WatchRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WatchBackend for NotifyWatchBackend {
    fn subscribe(&self, path: &Path) -> Result<WatchId> {
        // Register before watching so the first events are attributable.
        let id = self
            .registry()
            .reserve(path)
            .ok_or_else(|| anyhow!("{:?} is already watched", path))?;

        let watched = self
            .watcher
            .lock()
            .map_err(|_| anyhow!("watcher lock poisoned"))
            .and_then(|mut w| {
                w.watch(path, RecursiveMode::NonRecursive)
                    .with_context(|| format!("watching {:?}", path))
            });

        if let Err(err) = watched {
            self.registry().remove(id);
            return Err(err);
        }

        info!(%id, ?path, "subscription opened");
        Ok(id)
    }

    fn unsubscribe(&self, id: WatchId) -> Result<()> {
        let path = self
            .registry()
            .remove(id)
            .ok_or_else(|| anyhow!("unknown subscription {id}"))?;

        let mut watcher = self
            .watcher
            .lock()
            .map_err(|_| anyhow!("watcher lock poisoned"))?;

        match watcher.unwatch(&path) {
            Ok(()) => {
                debug!(%id, ?path, "subscription closed");
                Ok(())
            }
            // The kernel drops the watch by itself when the directory goes away.
            Err(err) if matches!(err.kind, notify::ErrorKind::WatchNotFound) => {
                debug!(%id, ?path, "subscription already gone");
                Ok(())
            }
            Err(err) => Err(err).with_context(|| format!("unwatching {:?}", path)),
        }
    }
}
