// src/engine/runtime.rs

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::errors::Result;

use super::dispatcher::EventDispatcher;
use super::RuntimeEvent;

/// Async shell around the [`EventDispatcher`].
///
/// Consumes [`RuntimeEvent`]s from a single channel, one at a time, so
/// events reach the dispatcher exactly in the order the backend delivered
/// them.
#[derive(Debug)]
pub struct Runtime {
    dispatcher: EventDispatcher,
    event_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
}

impl Runtime {
    pub fn new(dispatcher: EventDispatcher, event_rx: mpsc::UnboundedReceiver<RuntimeEvent>) -> Self {
        Self {
            dispatcher,
            event_rx,
        }
    }

    /// Main event loop.
    ///
    /// Returns `Ok(())` on shutdown or when the channel closes, and the
    /// dispatcher's error if a subscription could not be opened.
    pub async fn run(mut self) -> Result<()> {
        info!(root = ?self.dispatcher.root(), "dropwatch runtime started");

        while let Some(event) = self.event_rx.recv().await {
            match event {
                RuntimeEvent::Fs(fs_event) => {
                    trace!(?fs_event, "runtime received event");
                    self.dispatcher.dispatch(fs_event, Instant::now())?;
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    return Ok(());
                }
            }
        }

        info!("runtime event channel closed; exiting");
        Ok(())
    }
}

/// Ask a running [`Runtime`] to stop.
///
/// Returns `false` if the runtime has already stopped.
pub fn request_shutdown(tx: &mpsc::UnboundedSender<RuntimeEvent>) -> bool {
    if tx.send(RuntimeEvent::ShutdownRequested).is_err() {
        debug!("runtime already stopped; shutdown request ignored");
        return false;
    }
    true
}
