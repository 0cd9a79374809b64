//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for the identity of a starred repository and
//! the id assigned to a bookmark by the bookmark service. Each newtype
//! ensures validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// RepoUrl
// ============================================================================

/// Canonical web URL of a repository (e.g. `https://github.com/owner/repo`)
///
/// This is the identity of a starred item: it is the key used for diffing
/// snapshots and the join key against bookmark links. Comparison is exact;
/// no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoUrl(String);

impl RepoUrl {
    /// Create a new RepoUrl
    ///
    /// # Errors
    /// Returns error if the value is empty or not an `http(s)://` URL
    pub fn new(url: String) -> Result<Self, DomainError> {
        if url.is_empty() {
            return Err(DomainError::InvalidRepoUrl(
                "Repository URL cannot be empty".to_string(),
            ));
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        match rest {
            Some(host_and_path) if !host_and_path.is_empty() => {}
            _ => {
                return Err(DomainError::InvalidRepoUrl(format!(
                    "Repository URL must be an http(s) URL: {url}"
                )))
            }
        }

        if url.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidRepoUrl(format!(
                "Repository URL contains whitespace: {url}"
            )));
        }

        Ok(Self(url))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RepoUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RepoUrl {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RepoUrl {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoUrl> for String {
    fn from(url: RepoUrl) -> Self {
        url.0
    }
}

// ============================================================================
// BookmarkId
// ============================================================================

/// Identifier assigned to a bookmark by the bookmark service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(u64);

impl BookmarkId {
    /// Create a BookmarkId from a raw service id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl Display for BookmarkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookmarkId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| DomainError::InvalidBookmarkId(format!("{s}: {e}")))
    }
}

impl From<u64> for BookmarkId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
