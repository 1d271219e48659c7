// src/notifier/mod.rs

//! Outbound notification for finished subdirectories.
//!
//! - [`Notifier`] is the one-operation client contract: deliver a
//!   [`Notification`] once, best-effort.
//! - [`http`] provides the production client (`reqwest`, JSON POST).
//! - [`delivery`] runs notifications on their own Tokio tasks so the reaper
//!   only ever enqueues.

pub mod delivery;
pub mod http;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;
use crate::slots::ContentFlags;

pub use delivery::{DeliveryOutcome, NotificationSender, deliver, spawn_notifier};
pub use http::HttpNotifier;

/// Summary of one subdirectory, produced when it is reaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Base name of the subdirectory.
    pub directory: String,
    /// Full path of the subdirectory.
    pub path: PathBuf,
    pub flags: ContentFlags,
}

pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Client that delivers a [`Notification`] somewhere outside the process.
///
/// Called at most once per subdirectory lifecycle and never retried.
pub trait Notifier: Send + Sync {
    fn notify<'a>(&'a self, notification: &'a Notification) -> NotifyFuture<'a>;
}
