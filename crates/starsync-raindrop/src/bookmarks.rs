//! Raindrop.io bookmark endpoints
//!
//! | Operation         | Endpoint                                      |
//! |-------------------|-----------------------------------------------|
//! | existence check   | `POST /import/url/exists`                     |
//! | batch create      | `POST /raindrops`                             |
//! | collection search | `GET /raindrops/{collectionId}?search=&page=` |
//! | delete            | `DELETE /raindrop/{id}`                       |
//!
//! Search results are paged; [`find_link`] stops at the first exact match.
//!
//! Every call goes through [`RaindropClient::send_with_retry`], so a
//! throttled request is retried before it is reported as a failure.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use starsync_core::domain::{BookmarkDraft, BookmarkId, BookmarkRecord, RepoUrl};

use crate::client::RaindropClient;
use crate::RaindropError;

/// Most items the API accepts in one batch create
pub const MAX_BATCH: usize = 100;

/// Page size requested from collection search
const SEARCH_PAGE_SIZE: usize = 50;

/// Upper bound on search pages requested for one query
const MAX_SEARCH_PAGES: usize = 40;

// ============================================================================
// Raindrop API request / response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ExistsRequest<'a> {
    urls: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    #[serde(default = "default_result")]
    result: bool,
    #[serde(default)]
    duplicates: Vec<RaindropDuplicate>,
}

/// A link the API already holds
#[derive(Debug, Deserialize)]
struct RaindropDuplicate {
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    items: Vec<RaindropItem<'a>>,
}

/// One bookmark in a batch create
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RaindropItem<'a> {
    collection_id: i64,
    title: &'a str,
    link: &'a str,
    tags: &'a [String],
    note: &'a str,
    created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<&'a str>,
}

impl<'a> RaindropItem<'a> {
    fn from_draft(collection_id: i64, draft: &'a BookmarkDraft) -> Self {
        Self {
            collection_id,
            title: &draft.title,
            link: draft.link.as_str(),
            tags: &draft.tags,
            note: &draft.note,
            created: draft.created,
            excerpt: draft.excerpt.as_deref(),
        }
    }
}

/// Envelope shared by create, search and delete responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaindropEnvelope<T> {
    #[serde(default = "default_result")]
    result: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    /// Total matches across all pages (search only)
    #[serde(default)]
    count: Option<u64>,
}

/// Fields read back from created or searched bookmarks
#[derive(Debug, Deserialize)]
struct RaindropRecord {
    #[serde(rename = "_id")]
    id: u64,
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: Option<String>,
}

/// Item type for envelopes whose items are not inspected
#[derive(Debug, Deserialize)]
struct Ignored {}

fn default_result() -> bool {
    true
}

impl<T> RaindropEnvelope<T> {
    /// Fails when the API reported `result: false`
    fn ensure_ok(self, operation: &str) -> Result<Self, RaindropError> {
        if self.result {
            Ok(self)
        } else {
            Err(RaindropError::Rejected(format!(
                "{operation}: {}",
                self.error_message.as_deref().unwrap_or("result=false")
            )))
        }
    }
}

impl From<RaindropRecord> for BookmarkRecord {
    fn from(record: RaindropRecord) -> Self {
        BookmarkRecord {
            id: BookmarkId::new(record.id),
            link: record.link,
            title: record.title,
        }
    }
}

// ============================================================================
// Endpoint functions
// ============================================================================

/// Returns which of `links` are already bookmarked anywhere in the account
pub async fn existing_links(client: &RaindropClient, links: &[RepoUrl]) -> Result<HashSet<String>> {
    if links.is_empty() {
        return Ok(HashSet::new());
    }

    let path = "/import/url/exists";
    let body = ExistsRequest {
        urls: links.iter().map(RepoUrl::as_str).collect(),
    };

    let response: ExistsResponse = client
        .send_with_retry(path, || client.request(Method::POST, path).json(&body))
        .await?
        .json()
        .await
        .context("Failed to parse existence check response")?;

    if !response.result {
        return Err(RaindropError::Rejected("existence check returned result=false".into()).into());
    }

    let existing: HashSet<String> = response
        .duplicates
        .into_iter()
        .filter_map(|d| d.link)
        .collect();
    debug!(checked = links.len(), existing = existing.len(), "Existence check complete");
    Ok(existing)
}

/// Creates `drafts` in `collection_id`, returning the number created
///
/// Batches larger than [`MAX_BATCH`] are split into several requests.
pub async fn create_bookmarks(
    client: &RaindropClient,
    collection_id: i64,
    drafts: &[BookmarkDraft],
) -> Result<usize> {
    let path = "/raindrops";
    let mut created = 0;

    for batch in drafts.chunks(MAX_BATCH) {
        let body = CreateRequest {
            items: batch
                .iter()
                .map(|d| RaindropItem::from_draft(collection_id, d))
                .collect(),
        };

        let envelope: RaindropEnvelope<Ignored> = client
            .send_with_retry(path, || client.request(Method::POST, path).json(&body))
            .await?
            .json()
            .await
            .context("Failed to parse create response")?;
        let envelope = envelope.ensure_ok("create")?;

        // Older API versions answer without items; trust the request size then
        created += if envelope.items.is_empty() {
            batch.len()
        } else {
            envelope.items.len()
        };
    }

    debug!(collection_id, created, "Bookmarks created");
    Ok(created)
}

/// Searches `collection_id` for every bookmark whose text matches `query`
///
/// The service matches loosely; callers filter for exact links. Pages are
/// requested until one comes back short or `count` is reached.
pub async fn search_collection(
    client: &RaindropClient,
    collection_id: i64,
    query: &str,
) -> Result<Vec<BookmarkRecord>> {
    search_pages(client, collection_id, query, |_| false).await
}

/// Searches `collection_id` for `link`, stopping at the page holding the
/// exact match
///
/// A link also matches its longer siblings (`a/b` finds `a/b-fork`), so
/// the exact record may sit several pages in.
pub async fn find_link(
    client: &RaindropClient,
    collection_id: i64,
    link: &RepoUrl,
) -> Result<Vec<BookmarkRecord>> {
    search_pages(client, collection_id, link.as_str(), |r| r.matches(link)).await
}

async fn search_pages<F>(
    client: &RaindropClient,
    collection_id: i64,
    query: &str,
    found: F,
) -> Result<Vec<BookmarkRecord>>
where
    F: Fn(&BookmarkRecord) -> bool,
{
    let path = format!("/raindrops/{collection_id}");
    let mut records = Vec::new();

    for page in 0..MAX_SEARCH_PAGES {
        let envelope: RaindropEnvelope<RaindropRecord> = client
            .send_with_retry(&path, || {
                client
                    .request(Method::GET, &path)
                    .query(&[("search", query)])
                    .query(&[("perpage", SEARCH_PAGE_SIZE), ("page", page)])
            })
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse search response (page {page})"))?;
        let envelope = envelope.ensure_ok("search")?;

        let total = envelope.count;
        let fetched = envelope.items.len();
        let start = records.len();
        records.extend(envelope.items.into_iter().map(BookmarkRecord::from));

        if records[start..].iter().any(&found) {
            return Ok(records);
        }
        let exhausted = fetched < SEARCH_PAGE_SIZE
            || total.is_some_and(|count| records.len() as u64 >= count);
        if exhausted {
            return Ok(records);
        }
        debug!(collection_id, page, fetched, "Search page full, requesting next");
    }

    Err(RaindropError::InvalidResponse(format!(
        "search for {query} exceeded {MAX_SEARCH_PAGES} pages"
    ))
    .into())
}

/// Deletes one bookmark by id
pub async fn delete_bookmark(client: &RaindropClient, id: BookmarkId) -> Result<()> {
    let path = format!("/raindrop/{id}");

    let envelope: RaindropEnvelope<Ignored> = client
        .send_with_retry(&path, || client.request(Method::DELETE, &path))
        .await?
        .json()
        .await
        .context("Failed to parse delete response")?;
    envelope.ensure_ok("delete")?;

    debug!(%id, "Bookmark deleted");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
