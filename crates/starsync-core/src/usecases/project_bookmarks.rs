//! Bookmark projection use case
//!
//! Applies a reconciliation diff to the bookmark service. Both directions
//! are idempotent under repeated invocation:
//!
//! - additions are existence-checked in batches and only missing links
//!   are created, so a retried run never duplicates a bookmark;
//! - removals that find no matching bookmark are counted as not-found,
//!   which is what a second pass over the same removals observes.
//!
//! Failures are contained at the smallest scope (one chunk, one removal),
//! logged and counted. Nothing here returns an error to the caller.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::domain::{BookmarkDraft, RepoUrl, StarredItem};
use crate::ports::IBookmarkService;

/// Default number of bookmarks per existence check / create request
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Outcome of projecting additions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdditionReport {
    /// Bookmarks created
    pub imported: usize,
    /// Items skipped because their link already existed
    pub skipped_existing: usize,
    /// Chunks attempted
    pub chunks: usize,
    /// Chunks whose check or create failed
    pub failed_chunks: usize,
    /// Items contained in failed chunks
    pub failed_items: usize,
    /// One message per failed chunk
    pub errors: Vec<String>,
}

/// Outcome of projecting removals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    /// Bookmarks deleted
    pub deleted: usize,
    /// Removals with no matching bookmark (already absent)
    pub not_found: usize,
    /// Removals whose lookup or delete failed
    pub failed: usize,
    /// One message per failed removal
    pub errors: Vec<String>,
}

/// Result of importing one chunk
struct ChunkOutcome {
    imported: usize,
    skipped: usize,
}

/// Use case projecting starred-set changes onto the bookmark service
pub struct ProjectBookmarksUseCase {
    bookmark_service: Arc<dyn IBookmarkService + Send + Sync>,
    chunk_size: usize,
    tags: Vec<String>,
}

impl ProjectBookmarksUseCase {
    /// Creates a new ProjectBookmarksUseCase
    ///
    /// # Arguments
    ///
    /// * `bookmark_service` - Bookmark service bound to the target collection
    /// * `chunk_size` - Maximum bookmarks per batch request (values below 1 are raised to 1)
    /// * `tags` - Tags attached to every created bookmark
    pub fn new(
        bookmark_service: Arc<dyn IBookmarkService + Send + Sync>,
        chunk_size: usize,
        tags: Vec<String>,
    ) -> Self {
        Self {
            bookmark_service,
            chunk_size: chunk_size.max(1),
            tags,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Creates bookmarks for `items` that do not exist yet
    ///
    /// Items are split into chunks of `chunk_size`. Each chunk is checked
    /// for existing links and imported on its own; a failing chunk is
    /// recorded and the next chunk is still attempted.
    pub async fn apply_additions(&self, items: &[StarredItem]) -> AdditionReport {
        let mut report = AdditionReport::default();
        if items.is_empty() {
            debug!("No additions to project");
            return report;
        }

        let drafts: Vec<BookmarkDraft> = items
            .iter()
            .map(|item| BookmarkDraft::from_item(item, &self.tags))
            .collect();
        let total_chunks = drafts.len().div_ceil(self.chunk_size);

        info!(
            items = drafts.len(),
            chunks = total_chunks,
            chunk_size = self.chunk_size,
            "Projecting additions to bookmark service"
        );

        for (index, chunk) in drafts.chunks(self.chunk_size).enumerate() {
            let chunk_no = index + 1;
            report.chunks += 1;

            match self.import_chunk(chunk).await {
                Ok(outcome) => {
                    report.imported += outcome.imported;
                    report.skipped_existing += outcome.skipped;
                    if outcome.imported > 0 {
                        info!(
                            chunk = chunk_no,
                            imported = outcome.imported,
                            skipped = outcome.skipped,
                            "Added stars to bookmark service"
                        );
                    } else {
                        info!(
                            chunk = chunk_no,
                            size = chunk.len(),
                            "Skipped chunk, all links already bookmarked"
                        );
                    }
                }
                Err(e) => {
                    let first = chunk.first().map(|d| d.title.as_str()).unwrap_or_default();
                    error!(
                        chunk = chunk_no,
                        size = chunk.len(),
                        first = first,
                        error = %format!("{e:#}"),
                        "Failed to import chunk"
                    );
                    report.failed_chunks += 1;
                    report.failed_items += chunk.len();
                    report.errors.push(format!("chunk {chunk_no}: {e:#}"));
                }
            }
        }

        report
    }

    /// Deletes the bookmark matching each removed item
    ///
    /// A removal whose link is not bookmarked is counted as not-found.
    /// Each removal is independent: a failure is recorded and the next
    /// removal is still attempted.
    pub async fn apply_removals(&self, items: &[StarredItem]) -> RemovalReport {
        let mut report = RemovalReport::default();
        if items.is_empty() {
            debug!("No removals to project");
            return report;
        }

        info!(
            items = items.len(),
            "Removing unstarred repos from bookmark service"
        );

        for item in items {
            match self.remove_one(item.identity()).await {
                Ok(true) => {
                    report.deleted += 1;
                    info!(identity = %item.identity(), name = %item.full_name, "Deleted bookmark");
                }
                Ok(false) => {
                    report.not_found += 1;
                    info!(
                        identity = %item.identity(),
                        name = %item.full_name,
                        "Not found in bookmark service"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        identity = %item.identity(),
                        name = %item.full_name,
                        error = %format!("{e:#}"),
                        "Failed to delete bookmark"
                    );
                    report.errors.push(format!("{}: {e:#}", item.full_name));
                }
            }
        }

        info!(
            deleted = report.deleted,
            not_found = report.not_found,
            failed = report.failed,
            "Finished removing unstarred repos"
        );

        report
    }

    async fn import_chunk(&self, chunk: &[BookmarkDraft]) -> Result<ChunkOutcome> {
        let links: Vec<RepoUrl> = chunk.iter().map(|d| d.link.clone()).collect();
        let existing = self
            .bookmark_service
            .existing_links(&links)
            .await
            .context("Failed to check existing bookmarks")?;

        let to_import: Vec<BookmarkDraft> = chunk
            .iter()
            .filter(|d| !existing.contains(d.link.as_str()))
            .cloned()
            .collect();
        let skipped = chunk.len() - to_import.len();

        if to_import.is_empty() {
            return Ok(ChunkOutcome {
                imported: 0,
                skipped,
            });
        }

        let imported = self
            .bookmark_service
            .create_bookmarks(&to_import)
            .await
            .context("Failed to create bookmarks")?;

        Ok(ChunkOutcome { imported, skipped })
    }

    /// Returns `Ok(true)` if a bookmark was deleted, `Ok(false)` if none matched
    async fn remove_one(&self, identity: &RepoUrl) -> Result<bool> {
        let candidates = self
            .bookmark_service
            .search_by_link(identity)
            .await
            .context("Failed to search bookmarks")?;

        let Some(record) = candidates.iter().find(|r| r.matches(identity)) else {
            return Ok(false);
        };

        self.bookmark_service
            .delete_bookmark(record.id)
            .await
            .with_context(|| format!("Failed to delete bookmark {}", record.id))?;
        Ok(true)
    }
}
