// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Parses durations, the notification URL and the extension map.
/// - Resolves a relative `[watch].root` against the config file's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let mut config = ConfigFile::try_from(raw_config)?;

    if config.watch.root.is_relative() {
        config.watch.root = config_base_dir(path).join(&config.watch.root);
    }

    Ok(config)
}

/// Default config path: `Dropwatch.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Dropwatch.toml")
}

/// Directory relative paths in the config are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "etc/Dropwatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Dropwatch.toml" (parent = ""),
///   we fall back to the current working directory.
fn config_base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
