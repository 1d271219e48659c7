// src/watch/mod.rs

//! Filesystem-change subscriptions.
//!
//! This module is responsible for:
//! - The [`WatchBackend`] abstraction: open/close a non-recursive
//!   subscription on one directory and identify it by a [`WatchId`].
//! - The production backend on top of `notify`.
//! - Translating `notify`'s path-based events into handle-based
//!   [`FsEvent`]s.
//!
//! It does **not** know about slots or content kinds; it only turns
//! filesystem changes into attributed events.
//!
//! [`WatchId`]: crate::types::WatchId

pub mod backend;
pub mod notify_backend;
pub mod path_utils;

pub use backend::{ChangeKind, FsEvent, WatchBackend};
pub use notify_backend::NotifyWatchBackend;
pub use path_utils::WatchRegistry;
