// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use colored::Colorize;

use super::Context;
use crate::api::SearchResult;
use crate::display::{self, render_search_results, spinner};
use crate::error::CliError;

pub const AUDIOBOOK_FORMATS: [&str; 2] = ["m4b", "mp3"];
pub const EBOOK_FORMATS: [&str; 4] = ["epub", "mobi", "pdf", "azw3"];

/// Client-side narrowing of the server's results.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub audiobook: bool,
    pub ebook: bool,
    pub format: Option<String>,
}

impl SearchFilter {
    /// Value sent as the `mode` query parameter.
    pub fn mode(&self) -> Option<&'static str> {
        self.audiobook.then_some("audiobook")
    }

    fn accepts(&self, result: &SearchResult) -> bool {
        let format = result.format.to_ascii_lowercase();
        if self.audiobook && !AUDIOBOOK_FORMATS.contains(&format.as_str()) {
            return false;
        }
        if self.ebook && !EBOOK_FORMATS.contains(&format.as_str()) {
            return false;
        }
        match &self.format {
            Some(wanted) => wanted.eq_ignore_ascii_case(&format),
            None => true,
        }
    }
}

pub fn filter_results(results: Vec<SearchResult>, filter: &SearchFilter) -> Vec<SearchResult> {
    results.into_iter().filter(|r| filter.accepts(r)).collect()
}

/// "Showing ..." lines printed under the table.
pub fn footer(shown: usize, total: usize) -> Vec<String> {
    if total > shown {
        vec![
            format!("Showing {} of {} results", shown, total),
            format!("Use --limit {} to see all results", total),
        ]
    } else {
        vec![format!("Showing {} results", shown)]
    }
}

pub async fn run(
    ctx: &Context,
    query: &str,
    filter: &SearchFilter,
    limit: Option<u32>,
) -> Result<(), CliError> {
    let client = ctx.client()?;
    let limit = limit.unwrap_or_else(|| ctx.prefs.effective_limit()) as usize;

    let sp = spinner::create("Searching...");
    let results = client.search(query, filter.mode()).await;
    spinner::clear(&sp);
    let results = filter_results(results?, filter);

    if filter.audiobook && results.is_empty() {
        println!();
        display::warning("No audiobooks found in search results.");
        println!();
        display::hint("Audiobook releases are picked per book in the Shelfmark web UI.");
        display::hint(&format!(
            "Open {} -> Search -> Get -> pick an audiobook release, or try: shelfmark releases <ID>",
            client.base_url()
        ));
        println!();
        return Ok(());
    }

    println!();
    println!("{} \"{}\"", "Search results for".bold(), query.cyan());
    if filter.audiobook {
        display::hint("Filter: Audiobooks only (m4b, mp3)");
    }
    if filter.ebook {
        display::hint("Filter: Ebooks only (epub, mobi, pdf, azw3)");
    }
    if let Some(format) = &filter.format {
        display::hint(&format!("Format: {}", format.to_uppercase()));
    }

    let shown = &results[..results.len().min(limit)];
    println!("{}", render_search_results(shown));
    if !shown.is_empty() {
        println!();
        for line in footer(shown.len(), results.len()) {
            display::hint(&format!("  {}", line));
        }
    }
    println!();
    Ok(())
}
