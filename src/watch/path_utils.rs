// src/watch/path_utils.rs

//! Translation from `notify` events to [`FsEvent`]s.
//!
//! `notify` reports absolute paths, not subscription handles. The
//! [`WatchRegistry`] remembers which directory each [`WatchId`] watches so
//! an event path can be attributed back to the subscription that saw it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use notify::event::{AccessKind, AccessMode, CreateKind, ModifyKind};
use notify::{Event, EventKind};
use tracing::{debug, warn};

use crate::types::WatchId;
use crate::watch::backend::{ChangeKind, FsEvent};

/// Bidirectional map between watched directories and their handles.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    by_path: HashMap<PathBuf, WatchId>,
    by_id: HashMap<WatchId, PathBuf>,
    next_id: u64,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh handle for `path`. Returns `None` if `path` is already
    /// registered.
    pub fn reserve(&mut self, path: &Path) -> Option<WatchId> {
        if self.by_path.contains_key(path) {
            return None;
        }
        self.next_id += 1;
        let id = WatchId::new(self.next_id);
        self.by_path.insert(path.to_path_buf(), id);
        self.by_id.insert(id, path.to_path_buf());
        Some(id)
    }

    pub fn remove(&mut self, id: WatchId) -> Option<PathBuf> {
        let path = self.by_id.remove(&id)?;
        self.by_path.remove(&path);
        Some(path)
    }

    pub fn path_of(&self, id: WatchId) -> Option<&Path> {
        self.by_id.get(&id).map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Attribute an event path to a subscription.
    ///
    /// For creations the parent directory wins: `root/a` appearing is an
    /// event of `root`'s watch about entry `a`, even when `root/a` is watched
    /// by now. Any other event on a watched path belongs to that path's own
    /// watch, so attribute changes, moves and deletions of a tracked
    /// directory reach its slot. Remaining paths go to their parent's watch.
    pub fn attribute(&self, path: &Path, creation: bool) -> Option<(WatchId, Option<String>)> {
        if !creation {
            if let Some(&id) = self.by_path.get(path) {
                return Some((id, None));
            }
        }
        if let Some(parent) = path.parent() {
            if let Some(&id) = self.by_path.get(parent) {
                let name = path.file_name()?.to_str()?.to_string();
                return Some((id, Some(name)));
            }
        }
        self.by_path.get(path).map(|&id| (id, None))
    }
}

/// Map a `notify` event kind onto the coarser [`ChangeKind`].
///
/// `path` is consulted only for creation events whose kind does not say
/// whether a directory or a file appeared.
pub fn change_kind(kind: &EventKind, path: &Path) -> ChangeKind {
    match kind {
        EventKind::Create(CreateKind::Folder) => ChangeKind::DirCreated,
        EventKind::Create(CreateKind::File) => ChangeKind::FileCreated,
        EventKind::Create(_) => {
            if path.is_dir() {
                ChangeKind::DirCreated
            } else {
                ChangeKind::FileCreated
            }
        }
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => ChangeKind::WriteClosed,
        EventKind::Access(_) => ChangeKind::Accessed,
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Removed,
        EventKind::Any | EventKind::Other => ChangeKind::Other,
    }
}

/// Turn one `notify` event into zero or more attributed [`FsEvent`]s, one per
/// path that belongs to a registered subscription.
pub fn translate(event: &Event, registry: &WatchRegistry) -> Vec<FsEvent> {
    if event.need_rescan() {
        warn!(?event, "watcher reported dropped events; some activity may be missed");
    }

    let creation = matches!(event.kind, EventKind::Create(_));
    event
        .paths
        .iter()
        .filter_map(|path| match registry.attribute(path, creation) {
            Some((source, name)) => Some(FsEvent {
                source,
                kind: change_kind(&event.kind, path),
                name,
            }),
            None => {
                debug!(?path, "event path not under any subscription; dropping");
                None
            }
        })
        .collect()
}
