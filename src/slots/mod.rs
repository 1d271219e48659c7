// src/slots/mod.rs

//! Subdirectory tracking pool.
//!
//! - [`table`] holds the fixed-capacity [`SlotTable`] and its records.
//! - [`content`] defines the content kinds accumulated per slot.
//!
//! The table is shared between the event dispatcher and the idle reaper
//! through [`SharedSlots`]; every read-modify-write happens under one guard
//! obtained from [`lock_slots`].

pub mod content;
pub mod table;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use content::{ContentClassifier, ContentFlags, ContentKind};
pub use table::{MAX_NAME_LEN, SlotError, SlotTable, TrackedSubdir, Visit};

/// The slot table behind the single lock both actors use.
pub type SharedSlots = Arc<Mutex<SlotTable>>;

pub fn shared(capacity: usize) -> SharedSlots {
    Arc::new(Mutex::new(SlotTable::new(capacity)))
}

/// Acquire the table lock.
///
/// Each table operation leaves every slot in a consistent state, so a
/// poisoned lock is recovered rather than propagated.
pub fn lock_slots(slots: &SharedSlots) -> MutexGuard<'_, SlotTable> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}
