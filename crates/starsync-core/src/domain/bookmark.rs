//! Bookmark payloads and records
//!
//! A [`BookmarkDraft`] is what the projector asks the bookmark service to
//! create for a starred item; a [`BookmarkRecord`] is what the service
//! hands back when searching. The `link` field is the join key between
//! the two worlds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{BookmarkId, RepoUrl};
use super::starred::StarredItem;

/// Bookmark to be created for a starred item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    /// Title shown in the bookmark service (repository display name)
    pub title: String,
    /// Bookmarked URL (the item's identity)
    pub link: RepoUrl,
    /// Tags attached to the bookmark
    pub tags: Vec<String>,
    /// Free-text note summarizing language and topics
    pub note: String,
    /// Creation time reported to the service (when the star happened)
    pub created: DateTime<Utc>,
    /// Short description
    pub excerpt: Option<String>,
}

impl BookmarkDraft {
    /// Derives the bookmark payload for a starred item
    ///
    /// Tags are lowercased and trimmed; empty tags are dropped.
    pub fn from_item(item: &StarredItem, tags: &[String]) -> Self {
        let tags = tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            title: item.full_name.clone(),
            link: item.html_url.clone(),
            tags,
            note: Self::note_for(item),
            created: item.starred_at,
            excerpt: item.description.clone(),
        }
    }

    /// `topics: <language>, <topic>, ...` with the language omitted when unknown
    fn note_for(item: &StarredItem) -> String {
        let parts: Vec<&str> = item
            .language
            .as_deref()
            .filter(|l| !l.is_empty())
            .into_iter()
            .chain(item.topics.iter().map(String::as_str))
            .collect();
        format!("topics: {}", parts.join(", "))
    }
}

/// A bookmark as stored by the bookmark service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    /// Service-assigned id
    pub id: BookmarkId,
    /// Bookmarked URL, as stored by the service
    pub link: String,
    /// Title, if the service returned one
    pub title: Option<String>,
}

impl BookmarkRecord {
    /// Returns true if this record points exactly at `identity`
    pub fn matches(&self, identity: &RepoUrl) -> bool {
        self.link == identity.as_str()
    }
}
