// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shelfmark API client.
//!
//! Thin wrapper over the server's fixed REST surface. Every call is a single
//! request with a bounded timeout; failures are translated into [`ApiError`]
//! and never retried here.
//!
//! # Example
//!
//! ```no_run
//! use shelfmark::api::ShelfmarkClient;
//!
//! # async fn example() -> Result<(), shelfmark::api::ApiError> {
//! let client = ShelfmarkClient::new("http://localhost:8084")?;
//! let results = client.search("dune", None).await?;
//! for book in results {
//!     println!("{} by {}", book.title, book.author);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod types;

pub use error::ApiError;
pub use types::{
    BookInfo, Bucket, CancelResponse, DownloadResponse, DownloadState, DownloadStatus,
    HealthResponse, Quantity, RawStatusResponse, Release, ReleasesResponse, SearchResult,
    StatusEntry, StatusSnapshot,
};

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default Shelfmark endpoint.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8084";

/// Timeout applied to every request (in seconds).
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for a Shelfmark server.
#[derive(Debug, Clone)]
pub struct ShelfmarkClient {
    /// Base URL as configured, without a trailing slash.
    base_url: String,
    /// Parsed base URL used to build endpoint URLs.
    endpoint_root: Url,
    client: reqwest::Client,
}

impl ShelfmarkClient {
    /// Create a client for the server at `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = url.into().trim().trim_end_matches('/').to_string();
        let endpoint_root = parse_base_url(&base_url)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shelfmark-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            endpoint_root,
            client,
        })
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search the catalogue. `mode` is forwarded verbatim (e.g. `audiobook`).
    pub async fn search(&self, query: &str, mode: Option<&str>) -> Result<Vec<SearchResult>, ApiError> {
        let mut params = vec![("query", query)];
        if let Some(mode) = mode {
            params.push(("mode", mode));
        }
        self.request(Method::GET, &["api", "search"], &params).await
    }

    /// Ask the server to enqueue a download.
    pub async fn download(&self, id: &str, format: Option<&str>) -> Result<DownloadResponse, ApiError> {
        let mut params = vec![("id", id)];
        if let Some(format) = format {
            params.push(("format", format));
        }
        self.request(Method::GET, &["api", "download"], &params).await
    }

    /// Fetch the full status snapshot, normalized into a flat entry list.
    pub async fn status(&self) -> Result<StatusSnapshot, ApiError> {
        let raw: RawStatusResponse = self.request(Method::GET, &["api", "status"], &[]).await?;
        Ok(StatusSnapshot::from_raw(raw))
    }

    pub async fn cancel(&self, id: &str) -> Result<CancelResponse, ApiError> {
        self.request(Method::DELETE, &["api", "download", id, "cancel"], &[])
            .await
    }

    pub async fn releases(&self, id: &str) -> Result<Vec<Release>, ApiError> {
        let response: ReleasesResponse = self
            .request(Method::GET, &["api", "releases"], &[("id", id)])
            .await?;
        Ok(response.releases)
    }

    pub async fn info(&self, id: &str) -> Result<BookInfo, ApiError> {
        self.request(Method::GET, &["api", "info"], &[("id", id)]).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.request(Method::GET, &["api", "health"], &[]).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.endpoint_root.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let endpoint = url.path().to_string();
        debug!(%method, %endpoint, "sending request");

        let mut builder = self.client.request(method, url);
        if !params.is_empty() {
            builder = builder.query(params);
        }

        let response = builder.send().await.map_err(|e| self.map_transport_error(e))?;
        let status = response.status();
        debug!(%endpoint, status = status.as_u16(), "response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let body = response.text().await.map_err(|e| self.map_transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse {
            endpoint,
            detail: e.to_string(),
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Unreachable {
                url: self.base_url.clone(),
            }
        } else if e.is_timeout() {
            ApiError::Network(format!("request to {} timed out", self.base_url))
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Validate a server URL: absolute, http or https.
pub fn parse_base_url(url: &str) -> Result<Url, ApiError> {
    let parsed = Url::parse(url).map_err(|e| ApiError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl {
            url: url.to_string(),
            reason: "cannot be used as a base URL".to_string(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_normalization() {
        let client = ShelfmarkClient::new("http://localhost:8084/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8084");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            ShelfmarkClient::new("localhost:8084"),
            Err(ApiError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ShelfmarkClient::new("ftp://books.local"),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_keeps_path_prefix_and_encodes_ids() {
        let client = ShelfmarkClient::new("http://nas.local/shelfmark/").unwrap();
        let url = client.endpoint(&["api", "download", "a b/c", "cancel"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://nas.local/shelfmark/api/download/a%20b%2Fc/cancel"
        );
    }

    #[tokio::test]
    async fn test_search_sends_query_and_mode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("query", "dune"))
            .and(query_param("mode", "audiobook"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "abc", "title": "Dune", "author": "Frank Herbert", "format": "m4b", "size": "512MB", "year": "1965"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        let results = client.search("dune", Some("audiobook")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].author, "Frank Herbert");
    }

    #[tokio::test]
    async fn test_download_forwards_format() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/download"))
            .and(query_param("id", "abc"))
            .and(query_param("format", "epub"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc", "status": "queued", "message": "Added to queue"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        let ack = client.download("abc", Some("epub")).await.unwrap();
        assert_eq!(ack.status, "queued");
    }

    #[tokio::test]
    async fn test_status_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "queued": {},
                "downloading": {"abc": {"id": "abc", "title": "Dune", "status": "downloading", "progress": 12.5}}
            })))
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        let snapshot = client.status().await.unwrap();
        let entry = snapshot.find("abc").unwrap();
        assert_eq!(entry.bucket, Bucket::Downloading);
        assert_eq!(entry.download.progress, 12.5);
    }

    #[tokio::test]
    async fn test_cancel_uses_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/download/abc/cancel"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "message": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        assert!(client.cancel("abc").await.unwrap().success);
    }

    #[tokio::test]
    async fn test_releases_unwraps_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/releases"))
            .and(query_param("id", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "releases": [{"id": "r1", "title": "Dune (Unabridged)", "quality": "64kbps", "size": 1024, "format": "m4b", "source": "audiobookbay"}]
            })))
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        let releases = client.releases("abc").await.unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].source, "audiobookbay");
    }

    #[tokio::test]
    async fn test_info_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Dune", "author": "Frank Herbert", "pages": 412
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "ok", "version": "0.4.1"})),
            )
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        let info = client.info("abc").await.unwrap();
        assert_eq!(info.keys().next().map(String::as_str), Some("title"));
        assert_eq!(client.health().await.unwrap().version, "0.4.1");
    }

    #[tokio::test]
    async fn test_server_error_uses_message_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/download"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Book not found"})),
            )
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        let err = client.download("nope", None).await.unwrap_err();
        assert_eq!(err.to_string(), "API Error (404): Book not found");
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ShelfmarkClient::new(server.uri()).unwrap();
        assert!(matches!(
            client.health().await,
            Err(ApiError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_names_base_url() {
        // Grab a free port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}", addr);
        let client = ShelfmarkClient::new(&url).unwrap();
        let err = client.status().await.unwrap_err();

        assert!(matches!(err, ApiError::Unreachable { .. }));
        assert!(err.to_string().contains(&url));
    }
}
