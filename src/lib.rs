// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! shelfmark - command-line client for the Shelfmark download server
//!
//! Search the catalogue, queue books and audiobooks, and follow downloads
//! from a terminal. The server does the fetching; this crate only talks to
//! its REST API and keeps a small preferences file.
//!
//! # Core Modules
//!
//! - [`api`] - HTTP client, wire types and error taxonomy
//! - [`watch`] - Poll loop that follows one download to completion
//! - [`config`] - Local preferences (server URL, format, result limit)
//! - [`display`] - Size/speed/ETA formatting, tables and the status report
//! - [`setup`] - Editing the server's own settings file
//! - [`commands`] - One handler per subcommand
//! - [`error`] - CLI errors, exit codes and hint formatting

pub mod api;
pub mod cli;
pub mod colors;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod setup;
pub mod watch;

pub use api::{
    ApiError, DownloadState, DownloadStatus, Release, SearchResult, ShelfmarkClient, StatusEntry,
    StatusSnapshot, DEFAULT_SERVER_URL,
};

pub use config::{PreferenceKey, Preferences, PreferencesStore};

pub use error::{exit_codes, CliError};

pub use watch::{DownloadWatcher, StatusSource, WatchConfig, WatchError, WatchEvent, WatchReporter};
