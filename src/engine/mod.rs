// src/engine/mod.rs

//! The two actors that share the slot table.
//!
//! - [`dispatcher`]: turns each [`FsEvent`] into a slot allocation or a slot
//!   update. Synchronous and IO-free apart from opening subscriptions.
//! - [`reaper`]: periodically evicts idle slots and enqueues their
//!   notifications.
//! - [`runtime`]: the async shell that feeds events to the dispatcher in
//!   delivery order.

pub mod dispatcher;
pub mod reaper;
pub mod runtime;

use crate::watch::FsEvent;

/// Events flowing into the runtime from the watch backend and signal
/// handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A filesystem change attributed to one subscription.
    Fs(FsEvent),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub use dispatcher::{Dispatch, EventDispatcher};
pub use reaper::IdleReaper;
pub use runtime::{Runtime, request_shutdown};
