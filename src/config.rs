// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Local preferences for the CLI.
//!
//! A single JSON file holding the server URL, the preferred download format
//! and the default search result limit. Missing fields resolve to built-in
//! defaults and an unreadable or corrupt file behaves like an empty one.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::api::{parse_base_url, DEFAULT_SERVER_URL};

/// Default number of search results shown.
pub const DEFAULT_LIMIT: u32 = 10;

/// Overrides the directory holding `config.json`.
pub const CONFIG_DIR_ENV: &str = "SHELFMARK_CONFIG_DIR";

const APP_DIR_NAME: &str = "shelfmark-cli";
const CONFIG_FILE_NAME: &str = "config.json";

fn default_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_limit() -> Option<u32> {
    Some(DEFAULT_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: Option<u32>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            url: default_url(),
            format: None,
            limit: default_limit(),
        }
    }
}

impl Preferences {
    /// Result limit with the built-in fallback applied.
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Resolved value for `key`, or `None` when an optional key is unset.
    pub fn get(&self, key: PreferenceKey) -> Option<String> {
        match key {
            PreferenceKey::Url => Some(self.url.clone()),
            PreferenceKey::Format => self.format.clone(),
            PreferenceKey::Limit => self.limit.map(|l| l.to_string()),
        }
    }

    /// Validate and store `value` under `key`.
    pub fn set(&mut self, key: PreferenceKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            PreferenceKey::Url => {
                parse_base_url(value)?;
                self.url = value.trim_end_matches('/').to_string();
            }
            PreferenceKey::Format => {
                if value.is_empty() {
                    bail!("Format cannot be empty");
                }
                self.format = Some(value.to_ascii_lowercase());
            }
            PreferenceKey::Limit => {
                let limit: u32 = value
                    .parse()
                    .with_context(|| format!("Limit must be a positive number, got '{}'", value))?;
                if limit == 0 {
                    bail!("Limit must be at least 1");
                }
                self.limit = Some(limit);
            }
        }
        Ok(())
    }
}

/// The closed set of preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    Url,
    Format,
    Limit,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 3] = [PreferenceKey::Url, PreferenceKey::Format, PreferenceKey::Limit];

    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::Url => "url",
            PreferenceKey::Format => "format",
            PreferenceKey::Limit => "limit",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        PreferenceKey::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .with_context(|| format!("Unknown config key '{}'. Valid keys: url, format, limit", s))
    }
}

/// File-backed preferences.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Store at the per-user location (or `$SHELFMARK_CONFIG_DIR`).
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(default_config_dir()?.join(CONFIG_FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences, falling back to defaults on any problem.
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no preferences file, using defaults");
            return Preferences::default();
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "corrupt preferences file, using defaults");
                    Preferences::default()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable preferences file, using defaults");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(prefs)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn get(&self, key: PreferenceKey) -> Option<String> {
        self.load().get(key)
    }

    pub fn set(&self, key: PreferenceKey, value: &str) -> Result<Preferences> {
        let mut prefs = self.load();
        prefs.set(key, value)?;
        self.save(&prefs)?;
        Ok(prefs)
    }

    /// Restore built-in defaults.
    pub fn reset(&self) -> Result<Preferences> {
        let prefs = Preferences::default();
        self.save(&prefs)?;
        Ok(prefs)
    }
}

fn default_config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::config_dir().context("Could not find a config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, PreferencesStore) {
        let dir = TempDir::new().unwrap();
        let store = PreferencesStore::at(dir.path().join("nested").join("config.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_resolves_defaults() {
        let (_dir, store) = store();
        let prefs = store.load();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(store.get(PreferenceKey::Url).as_deref(), Some(DEFAULT_SERVER_URL));
        assert_eq!(store.get(PreferenceKey::Limit).as_deref(), Some("10"));
        assert_eq!(store.get(PreferenceKey::Format), None);
    }

    #[test]
    fn test_set_persists_and_validates() {
        let (_dir, store) = store();
        store.set(PreferenceKey::Url, "http://nas.local:8084/").unwrap();
        store.set(PreferenceKey::Format, "EPUB").unwrap();
        store.set(PreferenceKey::Limit, "25").unwrap();

        let prefs = store.load();
        assert_eq!(prefs.url, "http://nas.local:8084");
        assert_eq!(prefs.format.as_deref(), Some("epub"));
        assert_eq!(prefs.effective_limit(), 25);

        assert!(store.set(PreferenceKey::Limit, "zero").is_err());
        assert!(store.set(PreferenceKey::Limit, "0").is_err());
        assert!(store.set(PreferenceKey::Url, "not a url").is_err());
        assert_eq!(store.load().effective_limit(), 25);
    }

    #[test]
    fn test_reset_restores_default_url() {
        let (_dir, store) = store();
        store.set(PreferenceKey::Url, "http://elsewhere:9000").unwrap();
        store.reset().unwrap();
        assert_eq!(store.get(PreferenceKey::Url).as_deref(), Some("http://localhost:8084"));
    }

    #[test]
    fn test_corrupt_file_behaves_like_defaults() {
        let (dir, _) = store();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ this is not json").unwrap();
        let store = PreferencesStore::at(&path);
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let (dir, _) = store();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"format":"m4b"}"#).unwrap();
        let prefs = PreferencesStore::at(&path).load();
        assert_eq!(prefs.url, DEFAULT_SERVER_URL);
        assert_eq!(prefs.format.as_deref(), Some("m4b"));
        assert_eq!(prefs.limit, Some(DEFAULT_LIMIT));
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!("URL".parse::<PreferenceKey>().unwrap(), PreferenceKey::Url);
        let err = "colour".parse::<PreferenceKey>().unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }
}
