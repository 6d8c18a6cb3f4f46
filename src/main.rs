// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! shelfmark - command-line client for the Shelfmark download server
//!
//! Usage:
//!   shelfmark search "dune"             Search for books
//!   shelfmark download <ID> --watch     Queue and follow a download
//!   shelfmark status                    Show the download queue
//!   shelfmark config set url <URL>      Point at another server

use clap::Parser;
use colored::Colorize;

use shelfmark::cli::Cli;
use shelfmark::colors;
use shelfmark::commands::{self, Context};
use shelfmark::config::PreferencesStore;
use shelfmark::display;
use shelfmark::error::{exit_codes, CliError};

fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

fn should_disable_color(no_color_flag: bool, no_color_env: bool, dumb_terminal: bool) -> bool {
    no_color_flag || no_color_env || dumb_terminal
}

/// Logs go to stderr so they never interleave with tables on stdout.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("shelfmark=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}

fn report(err: &CliError) {
    display::error(&err.to_string());
    if let Some(hint) = err.hint() {
        eprintln!();
        eprintln!("{}", hint.dimmed());
    }
}

#[tokio::main]
async fn run(cli: Cli) -> Result<(), CliError> {
    let store = PreferencesStore::open_default()?;
    let ctx = Context::load(store, cli.url);
    commands::dispatch(cli.command, &ctx).await
}

fn main() {
    let cli = Cli::parse();

    let no_color = should_disable_color(cli.no_color, no_color_env_requested(), is_dumb_terminal());
    if no_color {
        colors::set_enabled(false);
    }
    init_tracing(cli.verbose, no_color);

    let code = match run(cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            report(&err);
            err.exit_code()
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_signal_disables_color() {
        assert!(!should_disable_color(false, false, false));
        assert!(should_disable_color(true, false, false));
        assert!(should_disable_color(false, true, false));
        assert!(should_disable_color(false, false, true));
    }
}
