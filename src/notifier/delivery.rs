// src/notifier/delivery.rs

//! Background delivery loop for notifications.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::notifier::{Notification, Notifier};

/// Handle the reaper uses to enqueue notifications. Sending never blocks.
pub type NotificationSender = mpsc::UnboundedSender<Notification>;

/// How a single delivery attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
    TimedOut,
}

/// Spawn the background delivery loop.
///
/// Each received notification is delivered in its own Tokio task, so one
/// slow endpoint never holds up the next notification. The loop ends when
/// every sender is dropped.
pub fn spawn_notifier(notifier: Arc<dyn Notifier>, timeout: Duration) -> NotificationSender {
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();

    tokio::spawn(async move {
        info!("notifier loop started");

        while let Some(notification) = rx.recv().await {
            let notifier = Arc::clone(&notifier);
            tokio::spawn(async move {
                deliver(notifier.as_ref(), &notification, timeout).await;
            });
        }

        info!("notifier loop finished (channel closed)");
    });

    tx
}

/// Attempt one delivery, bounded by `timeout`, and log the outcome.
pub async fn deliver(
    notifier: &dyn Notifier,
    notification: &Notification,
    timeout: Duration,
) -> DeliveryOutcome {
    debug!(directory = %notification.directory, flags = %notification.flags, "delivering notification");

    match tokio::time::timeout(timeout, notifier.notify(notification)).await {
        Ok(Ok(())) => {
            info!(
                directory = %notification.directory,
                status = notification.flags.bits(),
                flags = %notification.flags,
                "notification delivered"
            );
            DeliveryOutcome::Delivered
        }
        Ok(Err(err)) => {
            warn!(
                directory = %notification.directory,
                error = %err,
                "notification failed; not retrying"
            );
            DeliveryOutcome::Failed
        }
        Err(_) => {
            warn!(
                directory = %notification.directory,
                ?timeout,
                "notification timed out; not retrying"
            );
            DeliveryOutcome::TimedOut
        }
    }
}
