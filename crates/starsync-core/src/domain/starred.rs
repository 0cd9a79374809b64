//! Starred repository entity

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::RepoUrl;

/// One starred repository at a point in time
///
/// Field names match the on-disk archive format. Optional fields default
/// when absent so archives written by older versions keep loading.
///
/// Two items with the same [`identity`](Self::identity) are the same
/// logical entity even when the remaining fields have drifted between
/// fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarredItem {
    /// Display name, `owner/repo`
    pub full_name: String,
    /// Canonical web URL; the item's identity
    pub html_url: RepoUrl,
    /// When the authenticated user starred the repository
    pub starred_at: DateTime<Utc>,
    /// Repository description
    #[serde(default)]
    pub description: Option<String>,
    /// Primary language as reported by the hosting platform
    #[serde(default)]
    pub language: Option<String>,
    /// Topic tags; order is not significant
    #[serde(default)]
    pub topics: BTreeSet<String>,
}

impl StarredItem {
    /// Creates an item with no description, language or topics
    pub fn new(full_name: impl Into<String>, html_url: RepoUrl, starred_at: DateTime<Utc>) -> Self {
        Self {
            full_name: full_name.into(),
            html_url,
            starred_at,
            description: None,
            language: None,
            topics: BTreeSet::new(),
        }
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the primary language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the topic tags
    #[must_use]
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// The stable key used for diffing and bookmark matching
    pub fn identity(&self) -> &RepoUrl {
        &self.html_url
    }
}
