// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command handlers.
//!
//! Each handler performs one logical operation against the server (or the
//! local preferences) and reports failure as a [`CliError`]; printing the
//! error and choosing the exit status is left to `main`.

pub mod cancel;
pub mod config;
pub mod download;
pub mod health;
pub mod info;
pub mod releases;
pub mod search;
pub mod setup;
pub mod status;

use tracing::debug;

use crate::api::ShelfmarkClient;
use crate::cli::Commands;
use crate::config::{Preferences, PreferencesStore};
use crate::error::CliError;
use crate::setup::SetupUpdates;

/// Per-invocation state shared by the handlers.
#[derive(Debug, Clone)]
pub struct Context {
    pub store: PreferencesStore,
    pub prefs: Preferences,
    /// Server URL after applying `--url` / `SHELFMARK_URL`.
    pub url: String,
}

impl Context {
    /// Load preferences from `store` and resolve the server URL.
    pub fn load(store: PreferencesStore, url_override: Option<String>) -> Self {
        let prefs = store.load();
        let url = url_override
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| prefs.url.clone());
        debug!(%url, config = %store.path().display(), "resolved context");
        Self { store, prefs, url }
    }

    pub fn client(&self) -> Result<ShelfmarkClient, CliError> {
        Ok(ShelfmarkClient::new(self.url.as_str())?)
    }
}

/// Route a parsed subcommand to its handler.
pub async fn dispatch(command: Commands, ctx: &Context) -> Result<(), CliError> {
    match command {
        Commands::Search {
            query,
            audiobook,
            ebook,
            format,
            limit,
        } => {
            let filter = search::SearchFilter {
                audiobook,
                ebook,
                format,
            };
            search::run(ctx, &query, &filter, limit).await
        }
        Commands::Download { id, watch, format } => {
            download::run(ctx, &id, format.as_deref(), watch).await
        }
        Commands::Status => status::run(ctx).await,
        Commands::Cancel { id } => cancel::run(ctx, &id).await,
        Commands::Releases { id } => releases::run(ctx, &id).await,
        Commands::Info { id } => info::run(ctx, &id).await,
        Commands::Health => health::run(ctx).await,
        Commands::Config { action, key, value } => {
            config::run(ctx, action, key.as_deref(), value.as_deref())
        }
        Commands::Setup {
            qbittorrent_host,
            qbittorrent_user,
            qbittorrent_password,
            download_dir,
            config_path,
            show,
        } => {
            let updates = SetupUpdates {
                qbittorrent_host,
                qbittorrent_user,
                qbittorrent_password,
                download_dir,
            };
            setup::run(config_path, show, &updates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_url_override_wins_over_preference() {
        let dir = TempDir::new().unwrap();
        let store = PreferencesStore::at(dir.path().join("config.json"));
        store
            .set(crate::config::PreferenceKey::Url, "http://saved:8084")
            .unwrap();

        let ctx = Context::load(store.clone(), None);
        assert_eq!(ctx.url, "http://saved:8084");

        let ctx = Context::load(store.clone(), Some("http://flag:9000".into()));
        assert_eq!(ctx.url, "http://flag:9000");

        let ctx = Context::load(store, Some("  ".into()));
        assert_eq!(ctx.url, "http://saved:8084");
    }
}
