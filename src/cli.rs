// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command-line argument model.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelfmark")]
#[command(version)]
#[command(about = "A command-line client for the Shelfmark book/audiobook downloader")]
#[command(after_help = "Quick start:\n    \
    Search:              shelfmark search \"project hail mary\"\n    \
    Download and watch:  shelfmark download <ID> --watch\n    \
    Check the queue:     shelfmark status\n    \
    Point at a server:   shelfmark config set url http://nas.local:8084")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server URL for this invocation (overrides the saved preference)
    #[arg(long, global = true, env = "SHELFMARK_URL", value_name = "URL")]
    pub url: Option<String>,

    /// Verbose mode: debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for books or audiobooks
    ///
    /// Examples:
    ///   shelfmark search "dune"
    ///   shelfmark search "dune" --audiobook
    ///   shelfmark search "dune" --format epub --limit 25
    #[command(alias = "s")]
    Search {
        /// Search terms
        query: String,
        /// Audiobooks only (m4b, mp3)
        #[arg(short, long, conflicts_with = "ebook")]
        audiobook: bool,
        /// Ebooks only (epub, mobi, pdf, azw3)
        #[arg(short, long)]
        ebook: bool,
        /// Keep only one format (epub, mobi, m4b, pdf, ...)
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<String>,
        /// Maximum number of results to show
        #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },

    /// Queue a book for download
    ///
    /// Examples:
    ///   shelfmark download 3f2a9c...
    ///   shelfmark download 3f2a9c... --watch
    #[command(alias = "d")]
    Download {
        /// Book ID from search results
        id: String,
        /// Follow progress until the download finishes
        #[arg(short, long)]
        watch: bool,
        /// Preferred format (defaults to the saved format preference)
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<String>,
    },

    /// Show download status and queue
    Status,

    /// Cancel a queued or active download
    Cancel {
        /// Download ID
        id: String,
    },

    /// Show available releases for a book
    Releases {
        /// Book ID from search results
        id: String,
    },

    /// Show metadata for a book
    Info {
        /// Book ID from search results
        id: String,
    },

    /// Check that the server is up and report its version
    Health,

    /// Manage local preferences
    ///
    /// Keys: url, format, limit
    ///
    /// Examples:
    ///   shelfmark config list
    ///   shelfmark config get url
    ///   shelfmark config set url http://nas.local:8084
    ///   shelfmark config reset
    Config {
        /// What to do
        #[arg(value_enum)]
        action: ConfigAction,
        /// Preference key (url, format, limit)
        key: Option<String>,
        /// New value (for set)
        value: Option<String>,
    },

    /// Configure the Shelfmark server's download client
    ///
    /// Edits the server's settings.json; restart the server afterwards.
    ///
    /// Examples:
    ///   shelfmark setup --show
    ///   shelfmark setup --qbittorrent-host http://localhost:8090 --qbittorrent-user admin
    ///   shelfmark setup --download-dir /downloads --config-path ~/shelfmark/config
    Setup {
        /// qBittorrent Web UI address
        #[arg(long, value_name = "URL")]
        qbittorrent_host: Option<String>,
        /// qBittorrent user name
        #[arg(long, value_name = "USER")]
        qbittorrent_user: Option<String>,
        /// qBittorrent password
        #[arg(long, value_name = "PASSWORD")]
        qbittorrent_password: Option<String>,
        /// Directory the server downloads into and ingests from
        #[arg(long, value_name = "DIR")]
        download_dir: Option<String>,
        /// Server settings.json, or the config directory holding it (skips auto-detection)
        #[arg(long, value_name = "PATH")]
        config_path: Option<PathBuf>,
        /// Print the current server settings instead of changing them
        #[arg(long, conflicts_with_all = ["qbittorrent_host", "qbittorrent_user", "qbittorrent_password", "download_dir"])]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    Set,
    Get,
    List,
    Reset,
}
