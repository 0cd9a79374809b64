//! Domain error types
//!
//! Validation failures raised while constructing domain values.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Repository URL is empty or not an http(s) URL
    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    /// Bookmark id is not a positive integer
    #[error("Invalid bookmark ID: {0}")]
    InvalidBookmarkId(String),
}
