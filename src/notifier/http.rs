// src/notifier/http.rs

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::notifier::{Notification, Notifier, NotifyFuture};
use crate::slots::ContentFlags;

/// JSON body sent for each notification.
///
/// ```json
/// {"directory": "movie1", "path": "/srv/in/movie1", "status": 7,
///  "content": ["text", "media", "subtitle"]}
/// ```
#[derive(Debug, Serialize)]
struct Payload<'a> {
    directory: &'a str,
    path: &'a Path,
    status: u8,
    content: ContentFlags,
}

impl<'a> From<&'a Notification> for Payload<'a> {
    fn from(n: &'a Notification) -> Self {
        Payload {
            directory: &n.directory,
            path: &n.path,
            status: n.flags.bits(),
            content: n.flags,
        }
    }
}

/// Posts notifications as JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    url: Url,
}

impl HttpNotifier {
    /// Every request is bounded by `timeout`, connect time included.
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dropwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Notifier for HttpNotifier {
    fn notify<'a>(&'a self, notification: &'a Notification) -> NotifyFuture<'a> {
        Box::pin(async move {
            let payload = Payload::from(notification);
            debug!(url = %self.url, ?payload, "posting notification");

            self.client
                .post(self.url.clone())
                .json(&payload)
                .send()
                .await?
                .error_for_status()?;
            Ok(())
        })
    }
}
