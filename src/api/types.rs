// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Wire types returned by the Shelfmark server.
//!
//! The server is lenient about shapes: sizes arrive as either pre-formatted
//! strings ("4.6MB") or raw byte counts, and optional fields are frequently
//! missing. Everything here deserializes with defaults rather than failing.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// `null` deserializes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A value the server sends either as text or as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Text(String::new())
    }
}

impl Quantity {
    /// Numeric view of the value, parsing text when possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => Some(*n),
            Quantity::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Quantity::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

/// One hit from `/api/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: Quantity,
    #[serde(deserialize_with = "null_as_default")]
    pub year: Quantity,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub preview: Option<String>,
}

/// Acknowledgement returned when a download is enqueued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

/// Result of a cancel request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

/// One concrete downloadable option for a book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: Quantity,
    #[serde(deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasesResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub releases: Vec<Release>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

/// Book metadata from `/api/info`. The server returns an open-ended object,
/// so fields are kept in the order they were sent.
pub type BookInfo = IndexMap<String, serde_json::Value>;

/// Lifecycle tag of a download as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DownloadState {
    Queued,
    Locating,
    Resolving,
    Downloading,
    Complete,
    Done,
    Available,
    Completed,
    Error,
    Cancelled,
    Other(String),
}

impl DownloadState {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "queued" => Self::Queued,
            "locating" => Self::Locating,
            "resolving" => Self::Resolving,
            "downloading" => Self::Downloading,
            "complete" => Self::Complete,
            "done" => Self::Done,
            "available" => Self::Available,
            "completed" => Self::Completed,
            "error" => Self::Error,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Locating => "locating",
            Self::Resolving => "resolving",
            Self::Downloading => "downloading",
            Self::Complete => "complete",
            Self::Done => "done",
            Self::Available => "available",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
            Self::Other(tag) => tag,
        }
    }

    /// The file is ready on the server.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            Self::Complete | Self::Done | Self::Available | Self::Completed
        )
    }

    /// Waiting for the server to find or start the transfer.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::Locating | Self::Resolving)
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DownloadState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DownloadState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

/// Snapshot of a single download, as found inside a status bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub status: Option<DownloadState>,
    #[serde(deserialize_with = "null_as_default")]
    pub progress: f64,
    pub speed: Option<Quantity>,
    pub eta: Option<Quantity>,
    pub error: Option<String>,
}

impl DownloadStatus {
    /// Title for display, never empty.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Unknown"
        } else {
            &self.title
        }
    }

    /// Progress clamped into 0..=100.
    pub fn percent(&self) -> f64 {
        if self.progress.is_finite() {
            self.progress.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Raw `/api/status` payload: bucket name -> (download id -> status).
/// A bucket sent as `null` counts as empty.
pub type RawStatusResponse = IndexMap<String, Option<IndexMap<String, DownloadStatus>>>;

/// One named partition of a status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bucket {
    Downloading,
    Queued,
    Locating,
    Resolving,
    Complete,
    Done,
    Available,
    Error,
    Cancelled,
    Other(String),
}

impl Bucket {
    /// Known buckets in the order they are searched and listed.
    pub const KNOWN: [Bucket; 9] = [
        Bucket::Downloading,
        Bucket::Queued,
        Bucket::Locating,
        Bucket::Resolving,
        Bucket::Complete,
        Bucket::Done,
        Bucket::Available,
        Bucket::Error,
        Bucket::Cancelled,
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "downloading" => Self::Downloading,
            "queued" => Self::Queued,
            "locating" => Self::Locating,
            "resolving" => Self::Resolving,
            "complete" => Self::Complete,
            "done" => Self::Done,
            "available" => Self::Available,
            "error" => Self::Error,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Downloading => "downloading",
            Self::Queued => "queued",
            Self::Locating => "locating",
            Self::Resolving => "resolving",
            Self::Complete => "complete",
            Self::Done => "done",
            Self::Available => "available",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
            Self::Other(name) => name,
        }
    }

    fn rank(&self) -> usize {
        Self::KNOWN
            .iter()
            .position(|known| known == self)
            .unwrap_or(Self::KNOWN.len())
    }
}

/// A download together with the bucket it was found in.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub bucket: Bucket,
    pub download: DownloadStatus,
}

impl StatusEntry {
    /// Lifecycle state: the entry's own tag, else the bucket it sits in.
    pub fn state(&self) -> DownloadState {
        self.download
            .status
            .clone()
            .unwrap_or_else(|| DownloadState::parse(self.bucket.name()))
    }
}

/// Status snapshot flattened into one ordered sequence of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    entries: Vec<StatusEntry>,
}

impl StatusSnapshot {
    /// Normalize the bucketed payload. Known buckets come first in
    /// [`Bucket::KNOWN`] order, unknown ones follow in server order.
    /// Missing ids fall back to the map key.
    pub fn from_raw(raw: RawStatusResponse) -> Self {
        let mut buckets: Vec<(Bucket, IndexMap<String, DownloadStatus>)> = raw
            .into_iter()
            .map(|(name, items)| (Bucket::from_name(&name), items.unwrap_or_default()))
            .collect();
        // stable sort keeps server order among unknown buckets
        buckets.sort_by_key(|(bucket, _)| bucket.rank());

        let entries = buckets
            .into_iter()
            .flat_map(|(bucket, items)| {
                items.into_iter().map(move |(key, mut download)| {
                    if download.id.is_empty() {
                        download.id = key;
                    }
                    StatusEntry {
                        bucket: bucket.clone(),
                        download,
                    }
                })
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Locate a download by identifier across every bucket.
    pub fn find(&self, id: &str) -> Option<&StatusEntry> {
        self.entries.iter().find(|entry| entry.download.id == id)
    }

    /// Entries whose bucket satisfies `pred`, in snapshot order.
    pub fn in_buckets<'a>(
        &'a self,
        pred: impl Fn(&Bucket) -> bool + 'a,
    ) -> impl Iterator<Item = &'a StatusEntry> + 'a {
        self.entries.iter().filter(move |entry| pred(&entry.bucket))
    }
}
