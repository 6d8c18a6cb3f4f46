// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use colored::Colorize;
use indicatif::ProgressBar;

use super::Context;
use crate::api::ShelfmarkClient;
use crate::colors::status_label;
use crate::display::{self, spinner};
use crate::error::CliError;
use crate::watch::{DownloadWatcher, WatchEvent, WatchReporter};

/// Renders watch events as the spinner message.
pub struct SpinnerReporter {
    spinner: ProgressBar,
}

impl SpinnerReporter {
    pub fn new(spinner: ProgressBar) -> Self {
        Self { spinner }
    }
}

impl WatchReporter for SpinnerReporter {
    fn report(&mut self, event: WatchEvent) {
        self.spinner.set_message(event_message(&event));
    }
}

/// One-line description of a watch event.
pub fn event_message(event: &WatchEvent) -> String {
    match event {
        WatchEvent::NotVisible { attempt } => {
            format!("Waiting for the server to pick up the download... ({})", attempt)
        }
        WatchEvent::Downloading { percent, speed, title } => {
            format!("Downloading: {:.0}% | {} | {}", percent, speed, title)
        }
        WatchEvent::Stage { state, title } => format!("{}: {}", status_label(state), title),
    }
}

pub async fn run(ctx: &Context, id: &str, format: Option<&str>, watch: bool) -> Result<(), CliError> {
    let client = ctx.client()?;
    let format = format.or(ctx.prefs.format.as_deref());

    let sp = spinner::create("Starting download...");
    match client.download(id, format).await {
        Ok(ack) => {
            let message = if ack.message.trim().is_empty() {
                "Download queued".to_string()
            } else {
                ack.message
            };
            spinner::finish_success(&sp, &message);
        }
        Err(e) => {
            spinner::clear(&sp);
            return Err(e.into());
        }
    }

    println!();
    println!("  {} {}", "ID:".bold(), id.cyan());
    println!();

    if watch {
        watch_download(client, id).await
    } else {
        display::info("Use \"shelfmark status\" to check download progress");
        println!();
        Ok(())
    }
}

async fn watch_download(client: ShelfmarkClient, id: &str) -> Result<(), CliError> {
    let sp = spinner::create("Watching download progress...");
    let mut reporter = SpinnerReporter::new(sp.clone());
    let watcher = DownloadWatcher::new(client);

    match watcher.watch(id, &mut reporter).await {
        Ok(done) => {
            spinner::finish_success(&sp, "Download completed!");
            println!();
            println!("  {}", done.display_title().green());
            println!();
            Ok(())
        }
        Err(e) => {
            spinner::clear(&sp);
            Err(e.into())
        }
    }
}
