// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command-level errors, exit codes and hint formatting.

use thiserror::Error;

use crate::api::ApiError;
use crate::watch::WatchError;

/// Exit codes following sysexits.h conventions
pub mod exit_codes {
    /// Success - operation completed successfully
    pub const SUCCESS: i32 = 0;
    /// General error - unspecified error
    pub const ERROR: i32 = 1;
    /// Usage error - invalid command line arguments
    pub const USAGE: i32 = 64;
    /// Service unavailable - Shelfmark server not reachable
    pub const SERVICE_UNAVAILABLE: i32 = 69;
    /// Temporary failure - watch gave up, try again later
    pub const TEMP_FAIL: i32 = 75;
    /// Configuration error - preference or settings file problem
    pub const CONFIG: i32 = 78;
}

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad or missing arguments; nothing was sent to the server.
    #[error("{message}")]
    Usage { message: String, usage: Option<String> },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The server answered but refused the operation.
    #[error("{0}")]
    Rejected(String),

    /// Local file problems (preferences, server settings).
    #[error("{0:#}")]
    Config(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Config(err)
    }
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage {
            message: message.into(),
            usage: None,
        }
    }

    pub fn usage_with(message: impl Into<String>, usage: impl Into<String>) -> Self {
        CliError::Usage {
            message: message.into(),
            usage: Some(usage.into()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage { .. } => exit_codes::USAGE,
            CliError::Api(ApiError::Unreachable { .. }) => exit_codes::SERVICE_UNAVAILABLE,
            CliError::Api(ApiError::InvalidUrl { .. }) => exit_codes::CONFIG,
            CliError::Watch(WatchError::Api(ApiError::Unreachable { .. })) => {
                exit_codes::SERVICE_UNAVAILABLE
            }
            CliError::Watch(WatchError::TimedOut { .. }) => exit_codes::TEMP_FAIL,
            CliError::Config(_) => exit_codes::CONFIG,
            _ => exit_codes::ERROR,
        }
    }

    /// Follow-up lines printed under the error, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::Usage { usage: Some(usage), .. } => Some(usage.clone()),
            CliError::Api(ApiError::Unreachable { url })
            | CliError::Watch(WatchError::Api(ApiError::Unreachable { url })) => {
                Some(format_hints(
                    &[
                        "The Shelfmark server is not running",
                        "The configured URL points at the wrong host or port",
                    ],
                    &[
                        &format!("Check that the server answers at {}", url),
                        "Point the CLI elsewhere: shelfmark config set url http://host:8084",
                    ],
                ))
            }
            CliError::Watch(WatchError::TimedOut { .. }) => {
                Some("The download may still finish. Check later with: shelfmark status".to_string())
            }
            _ => None,
        }
    }
}

/// Formats possible causes and suggested fixes as an indented block.
///
/// ```
/// use shelfmark::error::format_hints;
///
/// let hints = format_hints(&["Server stopped"], &["Start it again"]);
/// assert!(hints.contains("Possible causes:"));
/// assert!(hints.contains("  1. Start it again"));
/// ```
pub fn format_hints(causes: &[&str], fixes: &[&str]) -> String {
    let mut output = String::new();

    if !causes.is_empty() {
        output.push_str("Possible causes:\n");
        for cause in causes {
            output.push_str(&format!("  - {}\n", cause));
        }
    }

    if !fixes.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str("Try these fixes:\n");
        for (i, fix) in fixes.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, fix));
        }
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let unreachable = CliError::Api(ApiError::Unreachable { url: "http://x".into() });
        let timeout = CliError::Watch(WatchError::TimedOut { attempts: 300 });
        let failed = CliError::Watch(WatchError::Failed { message: "boom".into() });
        let usage = CliError::usage("missing key");
        let server = CliError::Api(ApiError::Server { status: 500, message: "x".into() });

        assert_eq!(unreachable.exit_code(), exit_codes::SERVICE_UNAVAILABLE);
        assert_eq!(timeout.exit_code(), exit_codes::TEMP_FAIL);
        assert_eq!(failed.exit_code(), exit_codes::ERROR);
        assert_eq!(usage.exit_code(), exit_codes::USAGE);
        assert_eq!(server.exit_code(), exit_codes::ERROR);
        for err in [unreachable, timeout, failed, usage, server] {
            assert_ne!(err.exit_code(), exit_codes::SUCCESS);
        }
    }

    #[test]
    fn test_unreachable_hint_names_url() {
        let err = CliError::Api(ApiError::Unreachable { url: "http://nas:8084".into() });
        let hint = err.hint().unwrap();
        assert!(hint.contains("http://nas:8084"));
        assert!(hint.contains("Try these fixes:"));
    }

    #[test]
    fn test_timeout_message_is_distinct() {
        let err = CliError::Watch(WatchError::TimedOut { attempts: 300 });
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_format_hints_empty() {
        assert_eq!(format_hints(&[], &[]), "");
    }
}
