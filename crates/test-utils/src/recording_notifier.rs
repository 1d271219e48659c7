use std::sync::{Arc, Mutex};
use std::time::Duration;

use dropwatch::errors::DropwatchError;
use dropwatch::notifier::{Notification, Notifier, NotifyFuture};

/// A fake notifier that:
/// - records every notification it is asked to deliver
/// - optionally sleeps first (to exercise delivery timeouts)
/// - optionally fails every delivery.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<Notification>>>,
    delay: Option<Duration>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Notifications received so far, in arrival order.
    pub fn calls(&self) -> Vec<Notification> {
        self.calls.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify<'a>(&'a self, notification: &'a Notification) -> NotifyFuture<'a> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.calls.lock().unwrap().push(notification.clone());
            if self.fail {
                return Err(DropwatchError::Notify("endpoint unavailable".to_string()));
            }
            Ok(())
        })
    }
}
