// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Presentation layer.
//!
//! Formatting is pure: functions take already-fetched data and return
//! strings. The only functions that write are the message helpers below and
//! the spinner wrappers.

pub mod format;
pub mod report;
pub mod spinner;
pub mod table;

pub use format::{
    format_byte_count, format_bytes, format_eta, format_eta_field, format_size, format_speed,
    format_speed_field, truncate, ETA_PLACEHOLDER,
};
pub use report::render_status_report;
pub use table::{display_width, fit, render_releases, render_search_results, Table};

use colored::Colorize;

use crate::colors::symbols;

/// Single-line error on stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message.red());
}

pub fn success(message: &str) {
    println!("{} {}", symbols::SUCCESS.green().bold(), message.green());
}

pub fn info(message: &str) {
    println!("{} {}", symbols::INFO.cyan(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", symbols::WARNING.yellow(), message.yellow());
}

/// Secondary, dimmed line.
pub fn hint(message: &str) {
    println!("{}", message.dimmed());
}

/// Bold section heading preceded by a blank line.
pub fn heading(message: &str) {
    println!();
    println!("{}", message.bold());
}
