// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Download watcher.
//!
//! After a download is enqueued the watcher polls the status endpoint at a
//! fixed cadence until the download finishes, fails, or the attempt budget
//! runs out.
//!
//! # States
//!
//! ```text
//!  searching ──found──▶ queued/locating/... ◀──▶ downloading
//!      │                      │                      │
//!      │                      ├──────────────────────┼──▶ completed  (Ok)
//!      │                      └──────────────────────┴──▶ error      (Err Failed)
//!      └──── budget exhausted in any non-terminal state ─▶ timed out (Err TimedOut)
//! ```
//!
//! A download that has not shown up in any bucket yet is not an error: the
//! server may not have registered it. Hard API failures end the watch at once.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ApiError, DownloadState, DownloadStatus, ShelfmarkClient, StatusSnapshot};
use crate::display::{format_speed_field, truncate};

/// Delay between polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls before giving up (about five minutes at the default cadence).
pub const MAX_POLL_ATTEMPTS: u32 = 300;

/// Anything that can produce a status snapshot.
pub trait StatusSource {
    fn fetch_status(&self) -> impl Future<Output = Result<StatusSnapshot, ApiError>>;
}

impl StatusSource for ShelfmarkClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.status().await
    }
}

/// Progress notifications emitted once per poll.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// The id is not in any bucket yet.
    NotVisible { attempt: u32 },
    /// Transfer in progress.
    Downloading { percent: f64, speed: String, title: String },
    /// Any other non-terminal stage (queued, locating, unknown labels).
    Stage { state: DownloadState, title: String },
}

/// Receives [`WatchEvent`]s; the CLI renders them on a spinner.
pub trait WatchReporter {
    fn report(&mut self, event: WatchEvent);
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("{message}")]
    Failed { message: String },

    #[error("Download watch timed out after {attempts} status checks")]
    TimedOut { attempts: u32 },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy)]
pub struct WatchConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Watches a single download until it reaches a terminal outcome.
pub struct DownloadWatcher<S> {
    source: S,
    config: WatchConfig,
}

impl<S: StatusSource> DownloadWatcher<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, WatchConfig::default())
    }

    pub fn with_config(source: S, config: WatchConfig) -> Self {
        Self { source, config }
    }

    /// Poll until `id` completes (returns its final status), fails, or the
    /// attempt budget is spent.
    pub async fn watch<R: WatchReporter>(
        &self,
        id: &str,
        reporter: &mut R,
    ) -> Result<DownloadStatus, WatchError> {
        for attempt in 1..=self.config.max_attempts {
            let snapshot = self.source.fetch_status().await?;

            match snapshot.find(id) {
                None => {
                    debug!(id, attempt, "download not visible yet");
                    reporter.report(WatchEvent::NotVisible { attempt });
                }
                Some(entry) => {
                    let state = entry.state();
                    let download = &entry.download;
                    debug!(id, attempt, state = %state, progress = download.progress, "poll");

                    if state.is_finished() {
                        info!(id, attempt, "download finished");
                        return Ok(download.clone());
                    }

                    match state {
                        DownloadState::Error => {
                            let message = download
                                .error
                                .clone()
                                .filter(|e| !e.trim().is_empty())
                                .unwrap_or_else(|| "Unknown error".to_string());
                            return Err(WatchError::Failed { message });
                        }
                        DownloadState::Cancelled => {
                            return Err(WatchError::Failed {
                                message: "Download was cancelled".to_string(),
                            });
                        }
                        DownloadState::Downloading => {
                            reporter.report(WatchEvent::Downloading {
                                percent: download.percent(),
                                speed: format_speed_field(download.speed.as_ref()),
                                title: truncate(download.display_title(), 30),
                            });
                        }
                        _ => {
                            let title = if download.title.trim().is_empty() {
                                "Processing...".to_string()
                            } else {
                                truncate(&download.title, 40)
                            };
                            reporter.report(WatchEvent::Stage { state, title });
                        }
                    }
                }
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        Err(WatchError::TimedOut {
            attempts: self.config.max_attempts,
        })
    }
}
