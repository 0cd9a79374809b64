//! Starsync Raindrop - Raindrop.io bookmark client
//!
//! Provides an async client for:
//! - Batch existence checks and batch creation of bookmarks
//! - Searching a collection by link and deleting single bookmarks
//! - Automatic back-off on HTTP 429 responses
//!
//! ## Modules
//!
//! - [`client`] - Authenticated Raindrop REST API HTTP client
//! - [`retry`] - `Retry-After` parsing and retry policy
//! - [`bookmarks`] - Bookmark endpoints and wire types
//! - [`provider`] - [`IBookmarkService`](starsync_core::ports::IBookmarkService) adapter

pub mod bookmarks;
pub mod client;
pub mod provider;
pub mod retry;

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the Raindrop.io API
#[derive(Debug, Error)]
pub enum RaindropError {
    /// The token is missing, invalid or revoked
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token may not touch the requested collection
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded and the retry budget is spent
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Delay the server asked for on the last attempt
        retry_after: Duration,
    },

    /// The request was well-formed HTTP but rejected by the API
    #[error("Rejected: {0}")]
    Rejected(String),

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

impl RaindropError {
    /// Maps a non-success, non-429 status to an error
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(body),
            StatusCode::FORBIDDEN => Self::Forbidden(body),
            StatusCode::NOT_FOUND => Self::NotFound(body),
            s if s.is_client_error() => Self::Rejected(format!("{s}: {body}")),
            s if s.is_server_error() => Self::ServerError(format!("{s}: {body}")),
            s => Self::InvalidResponse(format!("unexpected status {s}: {body}")),
        }
    }
}
