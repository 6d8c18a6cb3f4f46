// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::Context;
use crate::api::CancelResponse;
use crate::display::{self, spinner};
use crate::error::CliError;

/// Message for a refused cancellation.
fn refusal(response: &CancelResponse) -> String {
    let message = response.message.trim();
    if message.is_empty() {
        "Failed to cancel download".to_string()
    } else {
        message.to_string()
    }
}

pub async fn run(ctx: &Context, id: &str) -> Result<(), CliError> {
    let client = ctx.client()?;

    let sp = spinner::create(&format!("Cancelling download {}...", id));
    let response = client.cancel(id).await;
    spinner::clear(&sp);
    let response = response?;

    if !response.success {
        return Err(CliError::Rejected(refusal(&response)));
    }
    display::success(&format!("Download {} cancelled", id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_message() {
        let silent = CancelResponse { success: false, message: "  ".into() };
        assert_eq!(refusal(&silent), "Failed to cancel download");

        let explained = CancelResponse { success: false, message: "Already finished".into() };
        assert_eq!(refusal(&explained), "Already finished");
    }
}
