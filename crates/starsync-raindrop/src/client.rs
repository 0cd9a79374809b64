//! Raindrop.io REST API client
//!
//! Provides a typed HTTP client for the Raindrop.io REST API. Handles the
//! authentication header, base URL construction and throttling.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starsync_raindrop::client::RaindropClient;
//! use starsync_raindrop::bookmarks;
//! use starsync_core::domain::RepoUrl;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = RaindropClient::new("raindrop-token");
//! let links = vec![RepoUrl::new("https://github.com/a/b".to_string())?];
//! let existing = bookmarks::existing_links(&client, &links).await?;
//! println!("{} already bookmarked", existing.len());
//! # Ok(())
//! # }
//! ```

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::retry::RetryPolicy;
use crate::RaindropError;

/// Base URL for Raindrop.io REST API v1
const RAINDROP_BASE_URL: &str = "https://api.raindrop.io/rest/v1";

/// HTTP client for Raindrop.io API calls
///
/// Wraps `reqwest::Client` with authentication headers, base URL
/// construction and 429 retry handling.
#[derive(Clone)]
pub struct RaindropClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// Test or OAuth access token
    token: String,
    /// Back-off policy for 429 responses
    retry: RetryPolicy,
}

impl RaindropClient {
    /// Creates a new RaindropClient with the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, RAINDROP_BASE_URL)
    }

    /// Creates a new RaindropClient with a custom base URL (useful for testing)
    ///
    /// # Arguments
    /// * `token` - A valid Raindrop.io token
    /// * `base_url` - Custom base URL for API requests, without trailing slash
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the 429 retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for the given method and path
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to base URL (e.g., "/raindrops")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url).bearer_auth(&self.token)
    }

    /// Sends a request, backing off and retrying on HTTP 429
    ///
    /// `build` is called once per attempt because a sent request cannot
    /// be reused. Non-success statuses other than 429 are mapped through
    /// [`RaindropError::from_status`] without retrying.
    ///
    /// # Errors
    ///
    /// Returns [`RaindropError::TooManyRequests`] once the retry budget is
    /// spent, or the mapped status error.
    pub async fn send_with_retry<F>(&self, path: &str, build: F) -> Result<Response, RaindropError>
    where
        F: Fn() -> RequestBuilder,
    {
        let max_retries = self.retry.max_retries;

        for attempt in 0..=max_retries {
            let response = build().send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = self.retry.delay_for(response.headers());
                if attempt >= max_retries {
                    warn!(path, attempts = attempt + 1, "429 retry limit exhausted");
                    return Err(RaindropError::TooManyRequests { retry_after });
                }

                info!(
                    path,
                    attempt,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Received 429, backing off"
                );
                tokio::time::sleep(retry_after).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                debug!(path, %status, "Raindrop request failed");
                return Err(RaindropError::from_status(status, body));
            }

            if attempt > 0 {
                info!(path, attempt, "Request succeeded after retry");
            }
            return Ok(response);
        }

        Err(RaindropError::InvalidResponse(format!(
            "retry loop exited unexpectedly for {path}"
        )))
    }
}
