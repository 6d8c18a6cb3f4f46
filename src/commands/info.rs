// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use colored::Colorize;
use serde_json::Value;

use super::Context;
use crate::api::BookInfo;
use crate::colors::separator;
use crate::display::{display_width, spinner, truncate};
use crate::error::CliError;

/// Longest value shown before truncation.
const MAX_VALUE_CHARS: usize = 200;

fn render_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Printable `label: value` rows, server order, empty fields dropped.
pub fn info_rows(info: &BookInfo) -> Vec<(String, String)> {
    info.iter()
        .filter_map(|(key, value)| {
            let value = render_value(value)?;
            Some((label(key), truncate(&value, MAX_VALUE_CHARS)))
        })
        .collect()
}

/// `publish_year` -> `Publish year`.
fn label(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn run(ctx: &Context, id: &str) -> Result<(), CliError> {
    let client = ctx.client()?;

    let sp = spinner::create("Fetching book info...");
    let info = client.info(id).await;
    spinner::clear(&sp);
    let rows = info_rows(&info?);

    println!();
    println!("{} {}", "Book info for ID:".bold(), id.cyan());
    if rows.is_empty() {
        println!("{}", "No details available.".yellow());
        println!();
        return Ok(());
    }

    let width = rows.iter().map(|(k, _)| display_width(k)).max().unwrap_or(0);
    println!("{}", separator(width + 40));
    for (key, value) in rows {
        let padding = " ".repeat(width - display_width(&key));
        println!("  {}{}  {}", key.bold(), padding, value);
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_order_and_skip_empty() {
        let info: BookInfo = serde_json::from_value(serde_json::json!({
            "title": "Dune",
            "authors": ["Frank Herbert", null],
            "publish_year": 1965,
            "description": "",
            "cover": null
        }))
        .unwrap();

        assert_eq!(
            info_rows(&info),
            vec![
                ("Title".to_string(), "Dune".to_string()),
                ("Authors".to_string(), "Frank Herbert".to_string()),
                ("Publish year".to_string(), "1965".to_string()),
            ]
        );
    }

    #[test]
    fn test_long_values_are_truncated() {
        let info: BookInfo =
            serde_json::from_value(serde_json::json!({"description": "x".repeat(500)})).unwrap();
        let rows = info_rows(&info);
        assert_eq!(rows[0].1.chars().count(), MAX_VALUE_CHARS);
    }
}
