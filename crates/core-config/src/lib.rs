//! Configuration loading and parsing.
//!
//! Parses `revi.toml` (or an override path provided by the binary). Every
//! section is optional and unknown fields are ignored so older config files
//! keep working. A missing file yields defaults silently; an unparsable file
//! yields defaults with a warning under the `config` target.
//!
//! ```toml
//! [versions]
//! directory = ".versions"
//! bucket_key = "base-name"   # or "full-path"
//!
//! [keys]
//! history = "ctrl-h"
//!
//! [log]
//! file = "revi.log"
//! ```

use anyhow::Result;
use core_events::KeyEvent;
use core_versions::{BucketKey, StoreSettings};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const DEFAULT_HISTORY_KEY: &str = "ctrl-h";

/// Terminal geometry the runtime hands to the config layer so derived values
/// (text rows) stay consistent between startup and resize handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_rows: u16,
    pub status_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_rows: u16, status_rows: u16) -> Self {
        Self {
            viewport_rows,
            status_rows,
        }
    }

    /// Rows available for buffer text (never less than one).
    pub fn text_rows(&self) -> u16 {
        self.viewport_rows.saturating_sub(self.status_rows).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketKeyConfig {
    #[default]
    BaseName,
    FullPath,
}

impl From<BucketKeyConfig> for BucketKey {
    fn from(value: BucketKeyConfig) -> Self {
        match value {
            BucketKeyConfig::BaseName => BucketKey::BaseName,
            BucketKeyConfig::FullPath => BucketKey::FullPath,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct VersionsConfig {
    #[serde(default = "VersionsConfig::default_directory")]
    pub directory: String,
    #[serde(default)]
    pub bucket_key: BucketKeyConfig,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            directory: Self::default_directory(),
            bucket_key: BucketKeyConfig::default(),
        }
    }
}

impl VersionsConfig {
    fn default_directory() -> String {
        core_versions::DEFAULT_VERSIONS_DIR.to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeysConfig {
    #[serde(default = "KeysConfig::default_history")]
    pub history: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            history: Self::default_history(),
        }
    }
}

impl KeysConfig {
    fn default_history() -> String {
        DEFAULT_HISTORY_KEY.to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file")]
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
        }
    }
}

impl LogConfig {
    fn default_file() -> PathBuf {
        PathBuf::from("revi.log")
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub versions: VersionsConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Parsed configuration plus values resolved from it.
#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,
    pub history_key: KeyEvent,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(None, ConfigFile::default())
    }
}

/// Config path: local `revi.toml` first, then the platform config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("revi.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("revi").join("revi.toml");
    }
    PathBuf::from("revi.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config::from_file(Some(content), file))
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    fn from_file(raw: Option<String>, file: ConfigFile) -> Self {
        let history_key = resolve_key(&file.keys.history, DEFAULT_HISTORY_KEY);
        Self {
            raw,
            file,
            history_key,
        }
    }

    /// Settings for the per-file snapshot store.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            directory: self.file.versions.directory.clone(),
            key: self.file.versions.bucket_key.into(),
        }
    }
}

fn resolve_key(name: &str, fallback: &str) -> KeyEvent {
    match name.parse::<KeyEvent>() {
        Ok(key) => key,
        Err(e) => {
            warn!(target: "config", key = name, fallback, error = %e, "key_name_invalid");
            fallback.parse().unwrap_or(KeyEvent::ctrl('h'))
        }
    }
}
