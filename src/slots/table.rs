// src/slots/table.rs

//! Fixed-capacity table of tracked subdirectories.
//!
//! The table is pure storage: it never opens or closes subscriptions. Callers
//! close a slot's subscription before releasing it.

use thiserror::Error;
use tokio::time::Instant;

use crate::slots::content::{ContentFlags, ContentKind};
use crate::types::{SlotId, WatchId};

/// Longest subdirectory name (in bytes) a slot will track.
pub const MAX_NAME_LEN: usize = 255;

/// Why an allocation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("all {capacity} slots are occupied")]
    Full { capacity: usize },

    #[error("subdirectory '{0}' is already tracked")]
    AlreadyTracked(String),

    #[error("subdirectory name is {len} bytes, limit is {max}")]
    NameTooLong { len: usize, max: usize },
}

/// State of one occupied slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSubdir {
    name: String,
    watch: Option<WatchId>,
    last_activity: Instant,
    flags: ContentFlags,
}

impl TrackedSubdir {
    fn new(name: String, now: Instant) -> Self {
        Self {
            name,
            watch: None,
            last_activity: now,
            flags: ContentFlags::empty(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn watch(&self) -> Option<WatchId> {
        self.watch
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn flags(&self) -> ContentFlags {
        self.flags
    }

    /// Reset the idle clock. Never moves it backwards.
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = self.last_activity.max(now);
    }

    pub fn record(&mut self, kind: ContentKind) {
        self.flags.insert(kind);
    }
}

/// What a [`SlotTable::for_each_occupied`] visitor wants done with a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    Release,
}

#[derive(Debug)]
pub struct SlotTable {
    slots: Vec<Option<TrackedSubdir>>,
}

impl SlotTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Occupy the first free slot for `name`.
    ///
    /// The new slot has empty flags, no watch and `last_activity = now`.
    pub fn allocate(&mut self, name: &str, now: Instant) -> Result<SlotId, SlotError> {
        if name.len() > MAX_NAME_LEN {
            return Err(SlotError::NameTooLong {
                len: name.len(),
                max: MAX_NAME_LEN,
            });
        }
        if self.find_by_name(name).is_some() {
            return Err(SlotError::AlreadyTracked(name.to_string()));
        }

        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(SlotError::Full {
                capacity: self.capacity(),
            })?;

        self.slots[index] = Some(TrackedSubdir::new(name.to_string(), now));
        Ok(SlotId(index))
    }

    /// Store the subscription handle of an occupied slot.
    ///
    /// Returns `false` if the slot is free.
    pub fn attach(&mut self, id: SlotId, watch: WatchId) -> bool {
        match self.get_mut(id) {
            Some(slot) => {
                slot.watch = Some(watch);
                true
            }
            None => false,
        }
    }

    /// Find the occupied slot that owns `watch`.
    pub fn lookup(&self, watch: WatchId) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.watch == Some(watch)))
            .map(SlotId)
    }

    pub fn find_by_name(&self, name: &str) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.name == name))
            .map(SlotId)
    }

    pub fn get(&self, id: SlotId) -> Option<&TrackedSubdir> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut TrackedSubdir> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Free a slot and hand back its final state.
    pub fn release(&mut self, id: SlotId) -> Option<TrackedSubdir> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Visit occupied slots in index order, releasing those the visitor asks
    /// for. Released records are returned in visit order.
    pub fn for_each_occupied<F>(&mut self, mut visitor: F) -> Vec<TrackedSubdir>
    where
        F: FnMut(SlotId, &mut TrackedSubdir) -> Visit,
    {
        let mut released = Vec::new();
        for (index, entry) in self.slots.iter_mut().enumerate() {
            let Some(slot) = entry.as_mut() else {
                continue;
            };
            if visitor(SlotId(index), slot) == Visit::Release {
                released.extend(entry.take());
            }
        }
        released
    }

    /// Names of all occupied slots, in index order.
    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().flatten().map(|s| s.name.as_str()).collect()
    }
}
