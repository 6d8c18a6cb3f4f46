// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use colored::Colorize;

use super::Context;
use crate::display::{render_releases, spinner};
use crate::error::CliError;

pub async fn run(ctx: &Context, id: &str) -> Result<(), CliError> {
    let client = ctx.client()?;

    let sp = spinner::create("Fetching releases...");
    let releases = client.releases(id).await;
    spinner::clear(&sp);
    let releases = releases?;

    println!();
    println!("{} {}", "Available releases for ID:".bold(), id.cyan());
    println!("{}", render_releases(&releases));
    println!();
    Ok(())
}
