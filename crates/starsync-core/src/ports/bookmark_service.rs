//! Bookmark service port (driven/secondary port)
//!
//! Interface for the bookmark-management service the starred-set is
//! projected onto.
//!
//! ## Design Notes
//!
//! - An implementation is bound to a single target collection at
//!   construction time; callers never pass a collection id.
//! - Batch operations take slices; the caller is responsible for keeping
//!   each batch within the service's request-size limit.

use std::collections::HashSet;

use crate::domain::{BookmarkDraft, BookmarkId, BookmarkRecord, RepoUrl};

/// Port trait for bookmark service operations
#[async_trait::async_trait]
pub trait IBookmarkService: Send + Sync {
    /// Returns the subset of `links` that already exist as bookmarks
    async fn existing_links(&self, links: &[RepoUrl]) -> anyhow::Result<HashSet<String>>;

    /// Creates one bookmark per draft, returning the number created
    async fn create_bookmarks(&self, drafts: &[BookmarkDraft]) -> anyhow::Result<usize>;

    /// Searches the target collection for bookmarks whose link contains `link`
    ///
    /// The search is a substring/full-text match; callers must filter
    /// the result for an exact link match.
    async fn search_by_link(&self, link: &RepoUrl) -> anyhow::Result<Vec<BookmarkRecord>>;

    /// Deletes a bookmark by id
    async fn delete_bookmark(&self, id: BookmarkId) -> anyhow::Result<()>;
}
