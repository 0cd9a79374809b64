//! Starsync GitHub - starred repositories client
//!
//! Provides an async client for:
//! - Listing the authenticated user's starred repositories with star timestamps
//! - Following `Link` header pagination until the last page
//!
//! ## Modules
//!
//! - [`client`] - Authenticated GitHub REST API HTTP client
//! - [`stars`] - Starred repository listing and response parsing
//! - [`provider`] - [`IStarSource`](starsync_core::ports::IStarSource) adapter

pub mod client;
pub mod provider;
pub mod stars;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the GitHub API
#[derive(Debug, Error)]
pub enum GithubError {
    /// The token is missing, invalid or revoked
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks the scope needed to read stars
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The primary rate limit is exhausted
    #[error("Rate limit exceeded, resets at epoch {reset_at}")]
    RateLimited {
        /// Unix timestamp from `X-RateLimit-Reset` (0 when absent)
        reset_at: i64,
    },

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GithubError {
    /// Maps a non-success status to an error
    ///
    /// A 403 with `X-RateLimit-Remaining: 0` is a rate limit, not a
    /// permission problem, so the caller passes the remaining/reset headers.
    pub fn from_status(
        status: StatusCode,
        body: String,
        rate_remaining: Option<u64>,
        rate_reset: Option<i64>,
    ) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(body),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited {
                reset_at: rate_reset.unwrap_or(0),
            },
            StatusCode::FORBIDDEN if rate_remaining == Some(0) => Self::RateLimited {
                reset_at: rate_reset.unwrap_or(0),
            },
            StatusCode::FORBIDDEN => Self::Forbidden(body),
            StatusCode::NOT_FOUND => Self::NotFound(body),
            s if s.is_server_error() => Self::ServerError(format!("{s}: {body}")),
            s => Self::InvalidResponse(format!("unexpected status {s}: {body}")),
        }
    }
}
