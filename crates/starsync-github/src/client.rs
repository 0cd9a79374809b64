//! GitHub REST API client
//!
//! Provides a typed HTTP client for the GitHub REST API. Handles the
//! authentication header, the star-timestamp media type and the headers
//! GitHub requires on every request.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starsync_github::client::GithubClient;
//! use starsync_github::stars;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GithubClient::new("ghp_token");
//! let snapshot = stars::fetch_all_stars(&client).await?;
//! println!("{} starred repositories", snapshot.len());
//! # Ok(())
//! # }
//! ```

use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;

use crate::GithubError;

/// Base URL for the GitHub REST API
const GITHUB_BASE_URL: &str = "https://api.github.com";

/// Media type that adds `starred_at` to each starred entry
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";

/// REST API version pinned on every request
const API_VERSION: &str = "2022-11-28";

/// Default and maximum page size for list endpoints
pub const DEFAULT_PER_PAGE: u32 = 100;

/// HTTP client for GitHub REST API calls
///
/// Wraps `reqwest::Client` with authentication headers and base URL
/// construction.
#[derive(Clone)]
pub struct GithubClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// Personal access token or workflow token
    token: String,
    /// Page size requested from list endpoints
    per_page: u32,
}

impl GithubClient {
    /// Creates a new GithubClient with the given token
    ///
    /// # Arguments
    /// * `token` - A GitHub token allowed to read the user's stars
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, GITHUB_BASE_URL)
    }

    /// Creates a new GithubClient with a custom base URL (GitHub Enterprise, tests)
    ///
    /// # Arguments
    /// * `token` - A GitHub token
    /// * `base_url` - Custom base URL for API requests, without trailing slash
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Sets the page size, clamped to `1..=100`
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, DEFAULT_PER_PAGE);
        self
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for a path relative to the base URL
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to base URL (e.g., "/user/starred")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.request_url(method, &url)
    }

    /// Creates an authenticated request builder for an absolute URL
    ///
    /// Pagination links are absolute, so they bypass the base URL.
    pub fn request_url(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, STAR_MEDIA_TYPE)
            .header(USER_AGENT, concat!("starsync/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Sends a request and converts non-success statuses into [`GithubError`]
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, GithubError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let (remaining, reset) = rate_limit_headers(response.headers());
        let body = response.text().await.unwrap_or_default();
        debug!(%status, ?remaining, ?reset, "GitHub request failed");
        Err(GithubError::from_status(status, body, remaining, reset))
    }
}

/// Reads `X-RateLimit-Remaining` and `X-RateLimit-Reset`
fn rate_limit_headers(headers: &HeaderMap) -> (Option<u64>, Option<i64>) {
    let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim);
    (
        read("x-ratelimit-remaining").and_then(|v| v.parse().ok()),
        read("x-ratelimit-reset").and_then(|v| v.parse().ok()),
    )
}
