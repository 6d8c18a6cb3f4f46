// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::Context;
use crate::display::{render_status_report, spinner};
use crate::error::CliError;

pub async fn run(ctx: &Context) -> Result<(), CliError> {
    let client = ctx.client()?;

    let sp = spinner::create("Fetching download status...");
    let snapshot = client.status().await;
    spinner::clear(&sp);

    println!("{}", render_status_report(&snapshot?));
    Ok(())
}
