// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared styling for shelfmark output.
//!
//! Everything goes through `colored`, so `--no-color`, `NO_COLOR` and dumb
//! terminals switch styling off in one place.
//!
//! Color usage conventions:
//! - RED = errors, failed downloads
//! - GREEN = success, completed downloads
//! - YELLOW = warnings, queued work
//! - CYAN = info, identifiers, active transfers
//! - GRAY = secondary text, table borders

use colored::{ColoredString, Colorize};

use crate::api::DownloadState;

/// Box drawing characters for tables
pub mod box_chars {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const TOP_LEFT: char = '┌';
    pub const TOP_RIGHT: char = '┐';
    pub const BOTTOM_LEFT: char = '└';
    pub const BOTTOM_RIGHT: char = '┘';
    pub const T_DOWN: char = '┬';
    pub const T_UP: char = '┴';
    pub const T_RIGHT: char = '├';
    pub const T_LEFT: char = '┤';
    pub const CROSS: char = '┼';
}

/// Symbols for status and feedback
pub mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "ℹ";
    pub const PROGRESS_FULL: &str = "█";
    pub const PROGRESS_EMPTY: &str = "░";
}

/// Turn styling off (or back on) for the whole process.
pub fn set_enabled(enabled: bool) {
    if enabled {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

/// Render a separator line
pub fn separator(width: usize) -> String {
    box_chars::HORIZONTAL.to_string().repeat(width).dimmed().to_string()
}

/// Render a progress bar of `width` cells followed by the percentage.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((percent / 100.0) * width as f64).floor() as usize;
    let empty = width.saturating_sub(filled);

    format!(
        "{}{} {}%",
        symbols::PROGRESS_FULL.repeat(filled).cyan(),
        symbols::PROGRESS_EMPTY.repeat(empty).dimmed(),
        percent.floor() as u64
    )
}

/// Colored, upper-cased format label (EPUB, M4B, ...).
pub fn format_badge(format: &str) -> ColoredString {
    let label = format!(" {} ", format.to_uppercase());
    match format.to_ascii_lowercase().as_str() {
        "epub" => label.blue().bold(),
        "mobi" => label.green().bold(),
        "m4b" => label.magenta().bold(),
        "mp3" => label.cyan().bold(),
        "pdf" => label.red().bold(),
        "azw3" => label.yellow().bold(),
        _ => label.white().bold(),
    }
}

/// Status label colored by lifecycle stage.
pub fn status_label(state: &DownloadState) -> ColoredString {
    let label = state.as_str();
    match state {
        DownloadState::Downloading => label.cyan(),
        s if s.is_finished() => label.green(),
        s if s.is_pending() => label.yellow(),
        DownloadState::Error => label.red(),
        DownloadState::Cancelled => label.dimmed(),
        _ => label.white(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_cells() {
        colored::control::set_override(false);
        assert_eq!(progress_bar(50.0, 10), "█████░░░░░ 50%");
        assert_eq!(progress_bar(0.0, 4), "░░░░ 0%");
        assert_eq!(progress_bar(250.0, 4), "████ 100%");
    }

    #[test]
    fn test_badge_is_upper_cased() {
        colored::control::set_override(false);
        assert_eq!(format_badge("epub").to_string(), " EPUB ");
        assert_eq!(format_badge("cbz").to_string(), " CBZ ");
    }
}
