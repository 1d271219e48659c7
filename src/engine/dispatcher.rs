// src/engine/dispatcher.rs

//! Event dispatch: root-level events allocate slots, subdirectory-level
//! events update them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use crate::errors::{DropwatchError, Result};
use crate::slots::{ContentClassifier, ContentFlags, SharedSlots, SlotError, lock_slots};
use crate::types::{SlotId, WatchId};
use crate::watch::{ChangeKind, FsEvent, WatchBackend};

/// What [`EventDispatcher::dispatch`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A new subdirectory got a slot and a subscription.
    Tracked {
        slot: SlotId,
        name: String,
        watch: WatchId,
    },
    /// An event was attributed to a tracked subdirectory.
    Updated { slot: SlotId, flags: ContentFlags },
    /// A created subdirectory could not be given a slot.
    Dropped(SlotError),
    /// The event's subscription no longer belongs to any slot.
    Stale,
    /// A root-level event other than a directory creation.
    Ignored,
}

#[derive(Debug)]
pub struct EventDispatcher {
    root: PathBuf,
    root_watch: WatchId,
    slots: SharedSlots,
    backend: Arc<dyn WatchBackend>,
    classifier: ContentClassifier,
}

impl EventDispatcher {
    pub fn new(
        root: impl Into<PathBuf>,
        root_watch: WatchId,
        slots: SharedSlots,
        backend: Arc<dyn WatchBackend>,
        classifier: ContentClassifier,
    ) -> Self {
        Self {
            root: root.into(),
            root_watch,
            slots,
            backend,
            classifier,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn root_watch(&self) -> WatchId {
        self.root_watch
    }

    /// Process one event at time `now`.
    ///
    /// The only error is a failed subscription on a freshly created
    /// subdirectory, which the caller must treat as fatal.
    pub fn dispatch(&self, event: FsEvent, now: Instant) -> Result<Dispatch> {
        if event.source == self.root_watch {
            self.on_root_event(event, now)
        } else {
            Ok(self.on_subdir_event(event, now))
        }
    }

    fn on_root_event(&self, event: FsEvent, now: Instant) -> Result<Dispatch> {
        let (ChangeKind::DirCreated, Some(name)) = (event.kind, event.name) else {
            trace!(kind = ?event.kind, "ignoring root-level event");
            return Ok(Dispatch::Ignored);
        };

        let mut slots = lock_slots(&self.slots);

        let slot = match slots.allocate(&name, now) {
            Ok(slot) => slot,
            Err(err @ SlotError::Full { .. }) => {
                warn!(
                    subdir = %name,
                    error = %err,
                    "slot table exhausted; subdirectory will not be tracked"
                );
                return Ok(Dispatch::Dropped(err));
            }
            Err(err) => {
                warn!(subdir = %name, error = %err, "not tracking subdirectory");
                return Ok(Dispatch::Dropped(err));
            }
        };

        let path = self.root.join(&name);
        match self.backend.subscribe(&path) {
            Ok(watch) => {
                slots.attach(slot, watch);
                info!(
                    subdir = %name,
                    %slot,
                    %watch,
                    occupied = slots.len(),
                    capacity = slots.capacity(),
                    "tracking new subdirectory"
                );
                Ok(Dispatch::Tracked { slot, name, watch })
            }
            Err(source) => {
                slots.release(slot);
                error!(?path, error = %source, "cannot watch created subdirectory");
                Err(DropwatchError::Subscribe { path, source })
            }
        }
    }

    fn on_subdir_event(&self, event: FsEvent, now: Instant) -> Dispatch {
        let mut slots = lock_slots(&self.slots);

        let Some(id) = slots.lookup(event.source) else {
            debug!(source = %event.source, kind = ?event.kind, "stale event; discarding");
            return Dispatch::Stale;
        };
        let Some(slot) = slots.get_mut(id) else {
            return Dispatch::Stale;
        };

        slot.touch(now);

        let file = event.name.as_deref();
        debug!(subdir = %slot.name(), kind = ?event.kind, ?file, "subdirectory activity");

        if event.kind == ChangeKind::WriteClosed {
            if let Some(kind) = file.and_then(|f| self.classifier.classify(f)) {
                slot.record(kind);
                debug!(subdir = %slot.name(), %kind, flags = %slot.flags(), "content recorded");
            }
        }

        Dispatch::Updated {
            slot: id,
            flags: slot.flags(),
        }
    }
}
