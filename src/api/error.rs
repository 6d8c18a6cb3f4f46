// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error taxonomy for calls against the Shelfmark server.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused or host unreachable.
    #[error("Cannot connect to Shelfmark server at {url}. Is it running?")]
    Unreachable { url: String },

    /// The server answered with a non-2xx status.
    #[error("API Error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other transport failure (DNS, timeout, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body could not be understood.
    #[error("Invalid response from {endpoint}: {detail}")]
    InvalidResponse { endpoint: String, detail: String },

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// Pull a human message out of an error body: `message`, then `error`,
    /// otherwise the canonical reason phrase for the status.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                ["message", "error"].iter().find_map(|field| {
                    json.get(field)
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.trim().is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
            });

        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}
