// src/config/validate.rs

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Url;

use crate::config::model::{
    ConfigFile, ContentSection, NotifySection, NotifySettings, RawConfigFile, WatchSection,
    WatchSettings,
};
use crate::errors::{DropwatchError, Result};
use crate::slots::ContentKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DropwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let watch = validate_watch(&raw.watch)?;
        let content = validate_content(&raw.content)?;
        let notify = validate_notify(&raw.notify)?;
        Ok(ConfigFile::new_unchecked(watch, content, notify))
    }
}

fn validate_watch(section: &WatchSection) -> Result<WatchSettings> {
    if section.root.as_os_str().is_empty() {
        return Err(DropwatchError::Config(
            "[watch].root must not be empty".to_string(),
        ));
    }

    if section.capacity == 0 {
        return Err(DropwatchError::Config(
            "[watch].capacity must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(WatchSettings {
        root: section.root.clone(),
        capacity: section.capacity,
        inactivity_timeout: positive_duration("[watch].inactivity_timeout", &section.inactivity_timeout)?,
        poll_interval: positive_duration("[watch].poll_interval", &section.poll_interval)?,
    })
}

fn validate_content(section: &ContentSection) -> Result<Vec<(String, ContentKind)>> {
    let groups = [
        (ContentKind::Text, &section.text),
        (ContentKind::Media, &section.media),
        (ContentKind::Subtitle, &section.subtitle),
    ];

    let mut seen: HashMap<String, ContentKind> = HashMap::new();
    let mut mapping = Vec::new();

    for (kind, extensions) in groups {
        for raw_ext in extensions.iter() {
            let ext = raw_ext.trim().trim_start_matches('.');
            if ext.is_empty() {
                return Err(DropwatchError::Config(format!(
                    "[content].{kind} contains an empty extension"
                )));
            }
            if ext.contains('.') || ext.contains('/') {
                return Err(DropwatchError::Config(format!(
                    "[content].{kind}: '{raw_ext}' is not a single file extension"
                )));
            }
            match seen.get(ext) {
                Some(&other) if other != kind => {
                    return Err(DropwatchError::Config(format!(
                        "extension '{ext}' is listed under both [content].{other} and [content].{kind}"
                    )));
                }
                Some(_) => continue,
                None => {
                    seen.insert(ext.to_string(), kind);
                    mapping.push((ext.to_string(), kind));
                }
            }
        }
    }

    Ok(mapping)
}

fn validate_notify(section: &NotifySection) -> Result<NotifySettings> {
    let url = Url::parse(section.url.trim()).map_err(|e| {
        DropwatchError::Config(format!("[notify].url '{}' is not a valid URL: {e}", section.url))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DropwatchError::Config(format!(
            "[notify].url must use http or https (got '{}')",
            url.scheme()
        )));
    }

    Ok(NotifySettings {
        url,
        timeout: positive_duration("[notify].timeout", &section.timeout)?,
        notify_on_empty: section.notify_on_empty,
    })
}

fn positive_duration(field: &str, value: &str) -> Result<Duration> {
    let duration = parse_duration(value)
        .map_err(|e| DropwatchError::Config(format!("{field}: {e}")))?;
    if duration.is_zero() {
        return Err(DropwatchError::Config(format!("{field} must be greater than zero")));
    }
    Ok(duration)
}

/// Parse a simple duration string like `"10s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration '{s}' is missing a unit suffix"))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(value.saturating_mul(60 * 60))),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
