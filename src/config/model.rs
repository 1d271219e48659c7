// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::slots::{ContentClassifier, ContentKind};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// root = "incoming"
/// capacity = 100
/// inactivity_timeout = "10s"
/// poll_interval = "1s"
///
/// [content]
/// text = ["txt"]
/// media = ["mp4"]
/// subtitle = ["srt"]
///
/// [notify]
/// url = "http://127.0.0.1:8080/dropwatch"
/// timeout = "5s"
/// notify_on_empty = true
/// ```
///
/// `[watch].root` and `[notify].url` are required; everything else has a
/// default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    pub watch: WatchSection,

    #[serde(default)]
    pub content: ContentSection,

    pub notify: NotifySection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directory whose immediate subdirectories are tracked. Relative paths
    /// are resolved against the directory containing the config file.
    pub root: PathBuf,

    /// Maximum number of subdirectories tracked at once.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// How long a subdirectory must be quiet before it is reaped.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout: String,

    /// How often the reaper looks for idle subdirectories.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
}

fn default_capacity() -> usize {
    100
}

fn default_inactivity_timeout() -> String {
    "10s".to_string()
}

fn default_poll_interval() -> String {
    "1s".to_string()
}

/// `[content]` section: file extensions per content kind, without the dot.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentSection {
    #[serde(default = "default_text")]
    pub text: Vec<String>,

    #[serde(default = "default_media")]
    pub media: Vec<String>,

    #[serde(default = "default_subtitle")]
    pub subtitle: Vec<String>,
}

fn default_text() -> Vec<String> {
    vec!["txt".to_string()]
}

fn default_media() -> Vec<String> {
    vec!["mp4".to_string()]
}

fn default_subtitle() -> Vec<String> {
    vec!["srt".to_string()]
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            text: default_text(),
            media: default_media(),
            subtitle: default_subtitle(),
        }
    }
}

/// `[notify]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySection {
    /// Endpoint that receives one JSON POST per finished subdirectory.
    pub url: String,

    /// Upper bound for one delivery attempt.
    #[serde(default = "default_notify_timeout")]
    pub timeout: String,

    /// Whether a subdirectory with no recognized content still produces a
    /// notification.
    #[serde(default = "default_notify_on_empty")]
    pub notify_on_empty: bool,
}

fn default_notify_timeout() -> String {
    "5s".to_string()
}

fn default_notify_on_empty() -> bool {
    true
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so every value here has been checked.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSettings,
    pub content: Vec<(String, ContentKind)>,
    pub notify: NotifySettings,
}

#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub root: PathBuf,
    pub capacity: usize,
    pub inactivity_timeout: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub url: Url,
    pub timeout: Duration,
    pub notify_on_empty: bool,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        watch: WatchSettings,
        content: Vec<(String, ContentKind)>,
        notify: NotifySettings,
    ) -> Self {
        Self {
            watch,
            content,
            notify,
        }
    }

    /// Extension classifier built from the `[content]` section.
    pub fn classifier(&self) -> ContentClassifier {
        ContentClassifier::new(self.content.iter().map(|(ext, kind)| (ext.clone(), *kind)))
    }
}
