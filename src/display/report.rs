// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Status report for `shelfmark status`.

use colored::Colorize;

use super::format::{format_eta_field, format_speed_field, truncate};
use crate::api::{Bucket, StatusEntry, StatusSnapshot};
use crate::colors::{progress_bar, symbols};

/// How many finished or failed items are listed before summarizing.
const RECENT_LIMIT: usize = 5;

fn is_active(bucket: &Bucket) -> bool {
    matches!(bucket, Bucket::Downloading)
}

fn is_waiting(bucket: &Bucket) -> bool {
    matches!(bucket, Bucket::Queued | Bucket::Locating | Bucket::Resolving)
}

fn is_finished(bucket: &Bucket) -> bool {
    matches!(bucket, Bucket::Complete | Bucket::Done | Bucket::Available)
}

fn is_failed(bucket: &Bucket) -> bool {
    matches!(bucket, Bucket::Error)
}

/// Last `RECENT_LIMIT` entries plus the count of older ones left out.
fn recent<'a>(entries: &'a [&'a StatusEntry]) -> (&'a [&'a StatusEntry], usize) {
    let skipped = entries.len().saturating_sub(RECENT_LIMIT);
    (&entries[skipped..], skipped)
}

/// Render the full status snapshot as grouped sections.
pub fn render_status_report(snapshot: &StatusSnapshot) -> String {
    let active: Vec<&StatusEntry> = snapshot.in_buckets(is_active).collect();
    let waiting: Vec<&StatusEntry> = snapshot.in_buckets(is_waiting).collect();
    let finished: Vec<&StatusEntry> = snapshot.in_buckets(is_finished).collect();
    let failed: Vec<&StatusEntry> = snapshot.in_buckets(is_failed).collect();
    let cancelled = snapshot
        .in_buckets(|b| matches!(b, Bucket::Cancelled))
        .count();
    let other: Vec<&StatusEntry> = snapshot
        .in_buckets(|b| matches!(b, Bucket::Other(_)))
        .collect();

    if active.is_empty() && waiting.is_empty() && finished.is_empty() && failed.is_empty() && other.is_empty() {
        let mut out = format!("  {}", "No downloads in queue.".dimmed());
        if cancelled > 0 {
            out.push_str(&format!("\n  {}", format!("{} cancelled", cancelled).dimmed()));
        }
        return out;
    }

    let mut out: Vec<String> = Vec::new();

    if !active.is_empty() {
        out.push(format!("  {}", "Active Downloads:".cyan().bold()));
        out.push(String::new());
        for entry in &active {
            let d = &entry.download;
            out.push(format!(
                "  {} | {} | {} | ETA {}",
                progress_bar(d.percent(), 30),
                truncate(d.display_title(), 25).white(),
                format_speed_field(d.speed.as_ref()),
                format_eta_field(d.eta.as_ref()),
            ));
        }
        out.push(String::new());
    }

    if !waiting.is_empty() {
        out.push(format!("  {}", "Queued:".yellow().bold()));
        out.push(String::new());
        for (i, entry) in waiting.iter().enumerate() {
            out.push(format!(
                "    {}. {} {}",
                (i + 1).to_string().dimmed(),
                entry.download.display_title(),
                format!("({})", entry.state()).dimmed(),
            ));
        }
        out.push(String::new());
    }

    if !other.is_empty() {
        out.push(format!("  {}", "Other:".white().bold()));
        out.push(String::new());
        for (i, entry) in other.iter().enumerate() {
            out.push(format!(
                "    {}. {} {}",
                (i + 1).to_string().dimmed(),
                entry.download.display_title(),
                format!("({})", entry.bucket.name()).dimmed(),
            ));
        }
        out.push(String::new());
    }

    if !finished.is_empty() {
        out.push(format!("  {}", "Completed:".green().bold()));
        out.push(String::new());
        let (shown, skipped) = recent(&finished);
        for (i, entry) in shown.iter().enumerate() {
            out.push(format!(
                "    {}. {} {}",
                (i + 1).to_string().dimmed(),
                symbols::SUCCESS.green(),
                entry.download.display_title(),
            ));
        }
        if skipped > 0 {
            out.push(format!("    {}", format!("... and {} more", skipped).dimmed()));
        }
        out.push(String::new());
    }

    if !failed.is_empty() {
        out.push(format!("  {}", "Errors:".red().bold()));
        out.push(String::new());
        let (shown, skipped) = recent(&failed);
        for (i, entry) in shown.iter().enumerate() {
            out.push(format!(
                "    {}. {} {}",
                (i + 1).to_string().dimmed(),
                symbols::ERROR.red(),
                entry.download.display_title(),
            ));
            if let Some(error) = entry.download.error.as_deref().filter(|e| !e.is_empty()) {
                out.push(format!("       {}", error.dimmed()));
            }
        }
        if skipped > 0 {
            out.push(format!("    {}", format!("... and {} more", skipped).dimmed()));
        }
        out.push(String::new());
    }

    if cancelled > 0 {
        out.push(format!("  {}", format!("{} cancelled", cancelled).dimmed()));
        out.push(String::new());
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RawStatusResponse;

    fn snapshot(json: serde_json::Value) -> StatusSnapshot {
        let raw: RawStatusResponse = serde_json::from_value(json).unwrap();
        StatusSnapshot::from_raw(raw)
    }

    #[test]
    fn test_empty_snapshot() {
        let report = render_status_report(&snapshot(serde_json::json!({
            "downloading": {}, "queued": {}, "error": {}
        })));
        assert!(report.contains("No downloads in queue."));
    }

    #[test]
    fn test_sections_are_grouped() {
        let report = strip_ansi_escapes::strip_str(render_status_report(&snapshot(serde_json::json!({
            "downloading": {"a": {"title": "Neuromancer", "progress": 50, "speed": "1.2 MB/s", "eta": 75}},
            "locating": {"b": {"title": "Kindred"}},
            "done": {"c": {"title": "Beloved"}},
            "error": {"d": {"title": "Ulysses", "error": "No sources found"}}
        }))));

        assert!(report.contains("Active Downloads:"));
        assert!(report.contains("Neuromancer"));
        assert!(report.contains("50%"));
        assert!(report.contains("1.2 MB/s"));
        assert!(report.contains("ETA 1:15"));
        assert!(report.contains("Queued:"));
        assert!(report.contains("Kindred (locating)"));
        assert!(report.contains("Completed:"));
        assert!(report.contains("✓ Beloved"));
        assert!(report.contains("Errors:"));
        assert!(report.contains("No sources found"));
    }

    #[test]
    fn test_completed_list_is_capped() {
        let mut done = serde_json::Map::new();
        for i in 0..8 {
            done.insert(format!("id{}", i), serde_json::json!({"title": format!("Book {}", i)}));
        }
        let report = strip_ansi_escapes::strip_str(render_status_report(&snapshot(
            serde_json::json!({ "complete": done }),
        )));
        assert!(report.contains("... and 3 more"));
        assert!(!report.contains("Book 2"));
        assert!(report.contains("Book 7"));
    }
}
