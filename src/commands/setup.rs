// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use colored::Colorize;
use std::path::PathBuf;

use crate::colors::{separator, symbols};
use crate::display;
use crate::error::CliError;
use crate::setup::{candidate_paths, locate, ServerSettings, SetupUpdates, SETTINGS_FILE_NAME};

const SETUP_EXAMPLE: &str = "Example:\n  \
    shelfmark setup --qbittorrent-host http://localhost:8090 \\\n                  \
    --qbittorrent-user admin \\\n                  \
    --qbittorrent-password yourpassword \\\n                  \
    --download-dir /downloads";

fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        // a config directory names the settings file inside it
        if path.is_dir() {
            return Ok(path.join(SETTINGS_FILE_NAME));
        }
        return Ok(path);
    }
    let home = dirs::home_dir();
    locate(&candidate_paths(home.as_deref())).ok_or_else(|| {
        CliError::usage_with(
            "Could not find the Shelfmark server settings.json",
            "Point at it explicitly:\n  shelfmark setup --config-path /path/to/shelfmark/config",
        )
    })
}

pub fn run(config_path: Option<PathBuf>, show: bool, updates: &SetupUpdates) -> Result<(), CliError> {
    if !show && updates.is_empty() {
        return Err(CliError::usage_with("No settings provided", SETUP_EXAMPLE));
    }

    let path = resolve_path(config_path)?;
    let mut settings = ServerSettings::load(&path)?;

    display::heading("Shelfmark Server Setup");
    display::info(&format!("Using config: {}", settings.path().display()));
    println!();

    if show {
        let rows = settings.summary();
        if rows.is_empty() {
            println!("{}", "No download client settings found.".yellow());
        } else {
            println!("{}", separator(50));
            for (label, value) in rows {
                println!("  {:<22} {}", format!("{}:", label).cyan(), value);
            }
            println!("{}", separator(50));
        }
        println!();
        return Ok(());
    }

    let changes = updates.apply(&mut settings);
    settings.save()?;

    println!("{}", "Updated settings:".bold());
    for change in &changes {
        println!("  {} {}", symbols::SUCCESS.green(), change);
    }
    println!();
    display::success("Shelfmark configuration updated!");
    display::hint("Restart Shelfmark for changes to take effect.");
    println!();
    Ok(())
}
