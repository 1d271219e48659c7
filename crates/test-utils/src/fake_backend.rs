use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use dropwatch::types::WatchId;
use dropwatch::watch::WatchBackend;

/// A fake watch backend that:
/// - hands out sequential `WatchId`s without touching the filesystem
/// - records which subscriptions are open and which were closed
/// - can be told to fail subscriptions, to exercise the fatal path.
///
/// Tests feed events to the dispatcher directly, using the ids this backend
/// returned.
#[derive(Debug, Default)]
pub struct FakeWatchBackend {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    active: BTreeMap<WatchId, PathBuf>,
    closed: Vec<WatchId>,
    failing_paths: HashSet<PathBuf>,
}

impl FakeWatchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `subscribe(path)` fail.
    pub fn fail_subscribe_for(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.failing_paths.insert(path.as_ref().to_path_buf());
    }

    /// Currently open subscriptions, ordered by id.
    pub fn active(&self) -> Vec<(WatchId, PathBuf)> {
        let state = self.state.lock().unwrap();
        state.active.iter().map(|(id, p)| (*id, p.clone())).collect()
    }

    pub fn is_active(&self, id: WatchId) -> bool {
        self.state.lock().unwrap().active.contains_key(&id)
    }

    /// Handle of the open subscription on `path`, if any.
    pub fn watch_for(&self, path: impl AsRef<Path>) -> Option<WatchId> {
        let state = self.state.lock().unwrap();
        state
            .active
            .iter()
            .find(|(_, p)| p.as_path() == path.as_ref())
            .map(|(id, _)| *id)
    }

    /// Subscriptions closed so far, in close order.
    pub fn closed(&self) -> Vec<WatchId> {
        self.state.lock().unwrap().closed.clone()
    }
}

impl WatchBackend for FakeWatchBackend {
    fn subscribe(&self, path: &Path) -> Result<WatchId> {
        let mut state = self.state.lock().unwrap();
        if state.failing_paths.contains(path) {
            return Err(anyhow!("permission denied: {:?}", path));
        }
        state.next_id += 1;
        let id = WatchId::new(state.next_id);
        state.active.insert(id, path.to_path_buf());
        Ok(id)
    }

    fn unsubscribe(&self, id: WatchId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .active
            .remove(&id)
            .ok_or_else(|| anyhow!("unknown subscription {id}"))?;
        state.closed.push(id);
        Ok(())
    }
}
