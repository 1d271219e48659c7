#![allow(dead_code)]

use std::path::Path;

use dropwatch::config::{ConfigFile, ContentSection, NotifySection, RawConfigFile, WatchSection};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the same defaults a minimal TOML file would get.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            config: RawConfigFile {
                watch: WatchSection {
                    root: root.as_ref().to_path_buf(),
                    capacity: 100,
                    inactivity_timeout: "10s".to_string(),
                    poll_interval: "1s".to_string(),
                },
                content: ContentSection::default(),
                notify: NotifySection {
                    url: "http://127.0.0.1:9/dropwatch".to_string(),
                    timeout: "5s".to_string(),
                    notify_on_empty: true,
                },
            },
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.watch.capacity = capacity;
        self
    }

    pub fn inactivity_timeout(mut self, value: &str) -> Self {
        self.config.watch.inactivity_timeout = value.to_string();
        self
    }

    pub fn poll_interval(mut self, value: &str) -> Self {
        self.config.watch.poll_interval = value.to_string();
        self
    }

    pub fn media_extension(mut self, ext: &str) -> Self {
        self.config.content.media.push(ext.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.config.notify.url = url.to_string();
        self
    }

    pub fn notify_on_empty(mut self, val: bool) -> Self {
        self.config.notify.notify_on_empty = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
