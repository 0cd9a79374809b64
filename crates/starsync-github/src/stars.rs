//! Starred repository listing
//!
//! Lists the authenticated user's starred repositories through
//! `GET /user/starred` with the star media type, which wraps each
//! repository together with the time it was starred.
//!
//! ## Pagination
//!
//! GitHub paginates with an RFC 8288 `Link` header. [`fetch_all_stars`]
//! requests the first page and follows `rel="next"` until a page arrives
//! without one. Any failing page fails the whole listing: a partial
//! listing would look like a wave of unstarred repositories downstream.

use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::LINK;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use starsync_core::domain::{RepoUrl, Snapshot, StarredItem};

use crate::client::GithubClient;
use crate::GithubError;

/// Path for the starred endpoint relative to the API base URL
const STARRED_PATH: &str = "/user/starred";

/// Upper bound on followed pages; 1000 pages of 100 is far past any real account
const MAX_PAGES: usize = 1000;

// ============================================================================
// GitHub API response types (JSON deserialization)
// ============================================================================

/// One entry of `GET /user/starred` under the star media type
#[derive(Debug, Deserialize)]
struct GithubStarEntry {
    /// When the user starred the repository
    starred_at: DateTime<Utc>,
    /// The starred repository
    repo: GithubRepo,
}

/// Repository fields used by the archive
#[derive(Debug, Deserialize)]
struct GithubRepo {
    full_name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    /// Absent on old payloads and `null` on some repositories
    #[serde(default)]
    topics: Option<Vec<String>>,
}

/// One page of starred repositories
#[derive(Debug, Clone)]
pub struct StarPage {
    /// Parsed items, in API order
    pub items: Vec<StarredItem>,
    /// Absolute URL of the next page, if any
    pub next_link: Option<String>,
}

// ============================================================================
// StarParser - converts API entries to domain items
// ============================================================================

/// Parser for converting GitHub starred entries into [`StarredItem`]s
pub struct StarParser;

impl StarParser {
    /// Converts one entry
    ///
    /// Empty descriptions and languages are normalized to `None`. An entry
    /// whose `html_url` is not a valid repository URL is rejected.
    fn parse_entry(entry: GithubStarEntry) -> Result<StarredItem, GithubError> {
        let repo = entry.repo;
        let html_url = RepoUrl::new(repo.html_url).map_err(|e| {
            GithubError::InvalidResponse(format!("{}: {e}", repo.full_name))
        })?;

        Ok(StarredItem {
            full_name: repo.full_name,
            html_url,
            starred_at: entry.starred_at,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            language: repo.language.filter(|l| !l.trim().is_empty()),
            topics: repo
                .topics
                .unwrap_or_default()
                .into_iter()
                .collect::<BTreeSet<_>>(),
        })
    }

    /// Converts a whole page body
    fn parse_page(entries: Vec<GithubStarEntry>) -> Result<Vec<StarredItem>, GithubError> {
        entries.into_iter().map(Self::parse_entry).collect()
    }

    /// Extracts the `rel="next"` target from a `Link` header value
    ///
    /// The header looks like:
    /// `<https://api.github.com/user/starred?page=2>; rel="next", <...>; rel="last"`
    pub fn next_link(header: &str) -> Option<String> {
        header.split(',').find_map(|part| {
            let mut segments = part.split(';');
            let target = segments.next()?.trim();
            let is_next = segments.any(|param| {
                let param = param.trim();
                param == "rel=\"next\"" || param == "rel=next"
            });
            if !is_next {
                return None;
            }
            let target = target.strip_prefix('<')?.strip_suffix('>')?;
            url::Url::parse(target).ok().map(|u| u.to_string())
        })
    }
}

// ============================================================================
// Listing functions
// ============================================================================

/// Fetches every starred repository, following pagination to the end
///
/// # Errors
///
/// Returns an error if any page request fails, returns a non-success
/// status, or cannot be parsed. No partial snapshot is ever returned.
pub async fn fetch_all_stars(client: &GithubClient) -> Result<Snapshot> {
    let first = format!(
        "{}{}?per_page={}",
        client.base_url(),
        STARRED_PATH,
        client.per_page()
    );

    let mut items = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(first);
    let mut page_count = 0usize;

    while let Some(url) = next.take() {
        if !visited.insert(url.clone()) {
            anyhow::bail!("Pagination loop detected at {url}");
        }
        page_count += 1;
        if page_count > MAX_PAGES {
            anyhow::bail!("Gave up after {MAX_PAGES} pages of starred repositories");
        }

        let page = fetch_star_page(client, &url)
            .await
            .with_context(|| format!("Failed to fetch starred page {page_count}"))?;

        debug!(
            page = page_count,
            items = page.items.len(),
            has_next = page.next_link.is_some(),
            "Received starred page"
        );

        items.extend(page.items);
        next = page.next_link;
    }

    let snapshot = Snapshot::from_items(items);
    debug!(
        total_items = snapshot.len(),
        pages = page_count,
        "Starred listing complete"
    );
    Ok(snapshot)
}

/// Fetches a single page from an absolute URL
pub async fn fetch_star_page(client: &GithubClient, url: &str) -> Result<StarPage> {
    let response = client.send(client.request_url(Method::GET, url)).await?;

    let next_link = response
        .headers()
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(StarParser::next_link);

    let entries: Vec<GithubStarEntry> = response
        .json()
        .await
        .context("Failed to parse starred page JSON")?;

    Ok(StarPage {
        items: StarParser::parse_page(entries)?,
        next_link,
    })
}

// ============================================================================
// Tests
// ============================================================================
