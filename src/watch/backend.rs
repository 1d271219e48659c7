// src/watch/backend.rs

//! Pluggable filesystem-change source.
//!
//! The dispatcher and the reaper talk to a `WatchBackend` instead of a
//! concrete watcher. Production uses
//! [`NotifyWatchBackend`](crate::watch::NotifyWatchBackend); tests provide a
//! fake that records subscriptions and lets them inject events by hand.

use std::fmt::Debug;
use std::path::Path;

use anyhow::Result;

use crate::types::WatchId;

/// Kind of change carried by an [`FsEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A directory was created inside the watched directory.
    DirCreated,
    /// A file (or other non-directory entry) was created.
    FileCreated,
    /// A file opened for writing was closed.
    WriteClosed,
    Modified,
    Accessed,
    Renamed,
    Removed,
    Other,
}

/// One raw change notification, attributed to the subscription that saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub source: WatchId,
    pub kind: ChangeKind,
    /// Name of the affected entry relative to the watched directory. `None`
    /// when the event concerns the watched directory itself.
    pub name: Option<String>,
}

impl FsEvent {
    /// Event about the entry `name` inside the watched directory.
    pub fn named(source: WatchId, kind: ChangeKind, name: impl Into<String>) -> Self {
        Self {
            source,
            kind,
            name: Some(name.into()),
        }
    }

    /// Event about the watched directory itself.
    pub fn on_self(source: WatchId, kind: ChangeKind) -> Self {
        Self {
            source,
            kind,
            name: None,
        }
    }
}

/// Opens and closes non-recursive subscriptions on directories.
///
/// Events for open subscriptions are delivered out of band (the production
/// backend pushes them into the runtime channel). Implementations must be
/// safe to call while the slot table lock is held, so they must not call
/// back into the slot table.
pub trait WatchBackend: Send + Sync + Debug {
    /// Start watching `path` and return the handle its events will carry.
    fn subscribe(&self, path: &Path) -> Result<WatchId>;

    /// Stop watching. Events already in flight for `id` may still arrive and
    /// are expected to be discarded as stale.
    fn unsubscribe(&self, id: WatchId) -> Result<()>;
}
