// src/engine/reaper.rs

//! Idle reaper: the only path that releases a tracked subdirectory.
//!
//! A subdirectory is considered finished once no event has been attributed
//! to it for longer than the inactivity threshold. Reaping it closes its
//! subscription, enqueues one notification and frees the slot, all under
//! the table lock so a late event can never be attributed to a slot that is
//! half released.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::notifier::{Notification, NotificationSender};
use crate::slots::{SharedSlots, Visit, lock_slots};
use crate::watch::WatchBackend;

#[derive(Debug)]
pub struct IdleReaper {
    root: PathBuf,
    slots: SharedSlots,
    backend: Arc<dyn WatchBackend>,
    threshold: Duration,
    notify_on_empty: bool,
    outbox: NotificationSender,
}

impl IdleReaper {
    pub fn new(
        root: impl Into<PathBuf>,
        slots: SharedSlots,
        backend: Arc<dyn WatchBackend>,
        threshold: Duration,
        notify_on_empty: bool,
        outbox: NotificationSender,
    ) -> Self {
        Self {
            root: root.into(),
            slots,
            backend,
            threshold,
            notify_on_empty,
            outbox,
        }
    }

    /// Reap every slot idle for strictly longer than the threshold at `now`.
    ///
    /// Returns the notifications that were enqueued.
    pub fn sweep(&self, now: Instant) -> Vec<Notification> {
        let mut sent = Vec::new();
        let mut slots = lock_slots(&self.slots);

        let reaped = slots.for_each_occupied(|slot_id, slot| {
            let idle_for = now.saturating_duration_since(slot.last_activity());
            if idle_for <= self.threshold {
                return Visit::Keep;
            }

            if let Some(watch) = slot.watch() {
                if let Err(err) = self.backend.unsubscribe(watch) {
                    warn!(subdir = %slot.name(), %watch, error = %err, "failed to close subscription");
                }
            }

            if slot.flags().is_empty() && !self.notify_on_empty {
                debug!(subdir = %slot.name(), "no recognized content; skipping notification");
            } else {
                let notification = Notification {
                    directory: slot.name().to_string(),
                    path: self.root.join(slot.name()),
                    flags: slot.flags(),
                };
                if self.outbox.send(notification.clone()).is_err() {
                    warn!(subdir = %slot.name(), "notifier loop gone; notification lost");
                }
                sent.push(notification);
            }

            info!(
                subdir = %slot.name(),
                slot = %slot_id,
                flags = %slot.flags(),
                ?idle_for,
                "subdirectory idle; releasing slot"
            );
            Visit::Release
        });

        if !reaped.is_empty() {
            debug!(reaped = reaped.len(), occupied = slots.len(), "sweep finished");
        }
        sent
    }

    /// Sweep on a fixed interval until the task is dropped or aborted.
    pub async fn run(self, poll_interval: Duration) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(?poll_interval, threshold = ?self.threshold, "idle reaper started");

        loop {
            ticker.tick().await;
            self.sweep(Instant::now());
        }
    }
}
