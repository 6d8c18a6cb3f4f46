// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Editing the Shelfmark server's own `settings.json`.
//!
//! The server reads its torrent client credentials and download directory
//! from a JSON settings file, usually mounted into its container. `setup`
//! finds that file, patches the handful of keys the CLI knows about and
//! leaves every other key untouched.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const QBITTORRENT_HOST: &str = "QBITTORRENT_HOST";
pub const QBITTORRENT_USER: &str = "QBITTORRENT_USER";
pub const QBITTORRENT_PASSWORD: &str = "QBITTORRENT_PASSWORD";
pub const DOWNLOAD_DIR: &str = "DOWNLOAD_DIR";
pub const INGEST_DIR: &str = "INGEST_DIR";
pub const SEARCH_MODE: &str = "SEARCH_MODE";
pub const BOOK_LANGUAGE: &str = "BOOK_LANGUAGE";

/// File name of the server settings inside its config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

const MASK: &str = "********";

/// Usual places the settings file lives, most specific first.
pub fn candidate_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("./config/settings.json")];
    if let Some(home) = home {
        paths.push(home.join("docker-services/shelfmark/config/settings.json"));
        paths.push(home.join("shelfmark/config/settings.json"));
        paths.push(home.join(".config/shelfmark/settings.json"));
    }
    paths.push(PathBuf::from("/config/settings.json"));
    paths
}

/// First existing file among `candidates`.
pub fn locate(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .inspect(|p| debug!(path = %p.display(), "checking for server settings"))
        .find(|p| p.is_file())
        .cloned()
}

/// The server settings file, loaded into memory.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl ServerSettings {
    /// Load `path`. A missing file starts empty; a file that is not a JSON
    /// object is an error so it never gets overwritten.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str::<Value>(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
            {
                Value::Object(map) => map,
                _ => bail!("{} does not contain a JSON object", path.display()),
            }
        } else {
            Map::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn set_str(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), Value::String(value.to_string()));
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(self.values.clone()))?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Known settings as label/value pairs, password masked.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(host) = self.get_str(QBITTORRENT_HOST) {
            rows.push(("qBittorrent Host", host.to_string()));
        }
        if let Some(user) = self.get_str(QBITTORRENT_USER) {
            rows.push(("qBittorrent User", user.to_string()));
        }
        if self.get_str(QBITTORRENT_PASSWORD).is_some() {
            rows.push(("qBittorrent Password", MASK.to_string()));
        }
        if let Some(dir) = self.get_str(DOWNLOAD_DIR).or_else(|| self.get_str(INGEST_DIR)) {
            rows.push(("Download Directory", dir.to_string()));
        }
        if let Some(mode) = self.get_str(SEARCH_MODE) {
            rows.push(("Search Mode", mode.to_string()));
        }
        if let Some(Value::Array(languages)) = self.values.get(BOOK_LANGUAGE) {
            let joined: Vec<&str> = languages.iter().filter_map(Value::as_str).collect();
            if !joined.is_empty() {
                rows.push(("Languages", joined.join(", ")));
            }
        }
        rows
    }
}

/// Values supplied on the `setup` command line.
#[derive(Debug, Clone, Default)]
pub struct SetupUpdates {
    pub qbittorrent_host: Option<String>,
    pub qbittorrent_user: Option<String>,
    pub qbittorrent_password: Option<String>,
    pub download_dir: Option<String>,
}

impl SetupUpdates {
    pub fn is_empty(&self) -> bool {
        self.qbittorrent_host.is_none()
            && self.qbittorrent_user.is_none()
            && self.qbittorrent_password.is_none()
            && self.download_dir.is_none()
    }

    /// Write the supplied values into `settings`; returns one line per change.
    pub fn apply(&self, settings: &mut ServerSettings) -> Vec<String> {
        let mut changes = Vec::new();

        if let Some(host) = &self.qbittorrent_host {
            settings.set_str(QBITTORRENT_HOST, host);
            changes.push(format!("qBittorrent Host: {}", host));
        }
        if let Some(user) = &self.qbittorrent_user {
            settings.set_str(QBITTORRENT_USER, user);
            changes.push(format!("qBittorrent User: {}", user));
        }
        if let Some(password) = &self.qbittorrent_password {
            settings.set_str(QBITTORRENT_PASSWORD, password);
            changes.push(format!("qBittorrent Password: {}", MASK));
        }
        if let Some(dir) = &self.download_dir {
            // the server ingests from the same directory it downloads into
            settings.set_str(DOWNLOAD_DIR, dir);
            settings.set_str(INGEST_DIR, dir);
            changes.push(format!("Download Directory: {}", dir));
        }

        changes
    }
}
