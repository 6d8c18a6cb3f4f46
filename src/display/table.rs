// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fixed-width box tables for search results and releases.

use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::format::format_size;
use crate::api::{Release, SearchResult};
use crate::colors::{box_chars, format_badge};

/// Display width of `s`, ignoring ANSI escape codes.
pub fn display_width(s: &str) -> usize {
    let stripped = strip_ansi_escapes::strip_str(s);
    UnicodeWidthStr::width(stripped.as_str())
}

/// Pad `s` to `target_width` columns, accounting for escape codes.
fn pad_display(s: &str, target_width: usize) -> String {
    let current = display_width(s);
    if current >= target_width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(target_width - current))
    }
}

/// Longest prefix of `text` that fits in `max_width` terminal columns.
pub fn fit(text: &str, max_width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= max_width
        })
        .collect()
}

/// A table with fixed column widths. Widths include one space of padding on
/// each side, so a column of width `w` holds `w - 2` columns of text.
pub struct Table {
    widths: Vec<usize>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, usize)]) -> Self {
        Self {
            widths: columns.iter().map(|(_, w)| *w).collect(),
            header: columns
                .iter()
                .map(|(name, _)| name.cyan().bold().to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Text capacity of column `index`.
    pub fn capacity(&self, index: usize) -> usize {
        self.widths.get(index).map_or(0, |w| w.saturating_sub(2))
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .widths
            .iter()
            .map(|w| box_chars::HORIZONTAL.to_string().repeat(*w))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
            .dimmed()
            .to_string()
    }

    fn line(&self, cells: &[String]) -> String {
        let bar = box_chars::VERTICAL.to_string().dimmed().to_string();
        let mut out = bar.clone();
        for (i, width) in self.widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            out.push(' ');
            out.push_str(&pad_display(cell, width.saturating_sub(2)));
            out.push(' ');
            out.push_str(&bar);
        }
        out
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.border(box_chars::TOP_LEFT, box_chars::T_DOWN, box_chars::TOP_RIGHT));
        lines.push(self.line(&self.header));
        lines.push(self.border(box_chars::T_RIGHT, box_chars::CROSS, box_chars::T_LEFT));
        for row in &self.rows {
            lines.push(self.line(row));
        }
        lines.push(self.border(box_chars::BOTTOM_LEFT, box_chars::T_UP, box_chars::BOTTOM_RIGHT));
        lines.join("\n")
    }
}

/// Table of search hits, or a "no results" line when empty.
pub fn render_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".yellow().to_string();
    }

    let mut table = Table::new(&[
        ("#", 4),
        ("Title", 35),
        ("Author", 20),
        ("Format", 10),
        ("Size", 12),
        ("Year", 6),
        ("ID", 34),
    ]);

    for (index, result) in results.iter().enumerate() {
        let year = result.year.to_string();
        let year = if year.trim().is_empty() { "-".to_string() } else { year };
        let row = vec![
            (index + 1).to_string().dimmed().to_string(),
            fit(&result.title, table.capacity(1)).white().to_string(),
            fit(&result.author, table.capacity(2)).dimmed().to_string(),
            format_badge(&fit(&result.format, table.capacity(3).saturating_sub(2))).to_string(),
            fit(&format_size(&result.size), table.capacity(4)).white().to_string(),
            fit(&year, table.capacity(5)).dimmed().to_string(),
            fit(&result.id, table.capacity(6)).cyan().to_string(),
        ];
        table.push(row);
    }

    table.render()
}

/// Table of releases, or a "no releases" line when empty.
pub fn render_releases(releases: &[Release]) -> String {
    if releases.is_empty() {
        return "No releases available.".yellow().to_string();
    }

    let mut table = Table::new(&[
        ("#", 4),
        ("Title/Quality", 45),
        ("Format", 10),
        ("Size", 12),
        ("Source", 15),
        ("ID", 15),
    ]);

    for (index, release) in releases.iter().enumerate() {
        let title = if release.quality.trim().is_empty() {
            release.title.clone()
        } else {
            format!("{} [{}]", release.title, release.quality)
        };
        let row = vec![
            (index + 1).to_string().dimmed().to_string(),
            fit(&title, table.capacity(1)).white().to_string(),
            format_badge(&fit(&release.format, table.capacity(2).saturating_sub(2))).to_string(),
            fit(&format_size(&release.size), table.capacity(3)).white().to_string(),
            fit(&release.source, table.capacity(4)).dimmed().to_string(),
            fit(&release.id, table.capacity(5)).dimmed().to_string(),
        ];
        table.push(row);
    }

    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Quantity;

    fn book(title: &str) -> SearchResult {
        SearchResult {
            id: "0123456789abcdef0123456789abcdef".into(),
            title: title.into(),
            author: "Ursula K. Le Guin".into(),
            format: "epub".into(),
            size: Quantity::Text("1048576".into()),
            year: Quantity::Text("1969".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_sets_render_messages() {
        assert!(render_search_results(&[]).contains("No results found."));
        assert!(render_releases(&[]).contains("No releases available."));
    }

    #[test]
    fn test_rows_have_uniform_width() {
        let long = "The Left Hand of Darkness: A Novel of the Hainish Cycle, Anniversary Edition";
        let rendered = render_search_results(&[book(long), book("Lathe")]);
        let widths: Vec<usize> = rendered.lines().map(display_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
        // 7 columns + 8 borders
        assert_eq!(widths[0], 4 + 35 + 20 + 10 + 12 + 6 + 34 + 8);
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let long = "The Left Hand of Darkness: A Novel of the Hainish Cycle";
        let rendered = strip_ansi_escapes::strip_str(render_search_results(&[book(long)]));
        assert!(rendered.contains(&long[..33]));
        assert!(!rendered.contains(long));
        assert!(rendered.contains("1.0 MB"));
        assert!(rendered.contains("EPUB"));
    }

    #[test]
    fn test_fit_counts_wide_characters() {
        assert_eq!(fit("三体三体", 5), "三体");
        assert_eq!(fit("Solaris", 3), "Sol");
    }

    #[test]
    fn test_release_table_includes_quality_and_source() {
        let release = Release {
            id: "r-1".into(),
            title: "Dune".into(),
            quality: "64kbps".into(),
            size: Quantity::Text("512MB".into()),
            format: "m4b".into(),
            source: "audiobookbay".into(),
        };
        let rendered = strip_ansi_escapes::strip_str(render_releases(&[release]));
        assert!(rendered.contains("Dune [64kbps]"));
        assert!(rendered.contains("512MB"));
        assert!(rendered.contains("audiobookbay"));
    }
}
