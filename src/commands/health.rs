// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use colored::Colorize;

use super::Context;
use crate::display::{self, spinner};
use crate::error::CliError;

/// Status labels that mean the server is fine. An empty status counts too.
fn is_healthy(status: &str) -> bool {
    let status = status.trim();
    status.is_empty() || status.eq_ignore_ascii_case("ok") || status.eq_ignore_ascii_case("healthy")
}

pub async fn run(ctx: &Context) -> Result<(), CliError> {
    let client = ctx.client()?;

    let sp = spinner::create(&format!("Checking {}...", client.base_url()));
    let health = client.health().await;
    spinner::clear(&sp);
    let health = health?;

    let status = health.status.trim();
    if is_healthy(status) {
        display::success(&format!("Shelfmark server is up at {}", client.base_url()));
    } else {
        display::warning(&format!(
            "Shelfmark server at {} answered but reports status '{}'",
            client.base_url(),
            status
        ));
    }
    println!("  {:<9} {}", "Status:".bold(), if status.is_empty() { "ok" } else { status });
    if !health.version.trim().is_empty() {
        println!("  {:<9} {}", "Version:".bold(), health.version);
    }
    Ok(())
}
