//! RaindropBookmarkService - IBookmarkService implementation for Raindrop.io
//!
//! Binds a [`RaindropClient`] to one target collection. Existence checks
//! are account-wide (that is what the API offers); searches and creates
//! are scoped to the collection.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use starsync_core::domain::{BookmarkDraft, BookmarkId, BookmarkRecord, RepoUrl};
use starsync_core::ports::IBookmarkService;

use crate::bookmarks;
use crate::client::RaindropClient;

/// Bookmark service writing into a single Raindrop collection
pub struct RaindropBookmarkService {
    client: RaindropClient,
    collection_id: i64,
}

impl RaindropBookmarkService {
    pub fn new(client: RaindropClient, collection_id: i64) -> Self {
        Self {
            client,
            collection_id,
        }
    }

    pub fn collection_id(&self) -> i64 {
        self.collection_id
    }
}

#[async_trait]
impl IBookmarkService for RaindropBookmarkService {
    async fn existing_links(&self, links: &[RepoUrl]) -> Result<HashSet<String>> {
        bookmarks::existing_links(&self.client, links).await
    }

    async fn create_bookmarks(&self, drafts: &[BookmarkDraft]) -> Result<usize> {
        bookmarks::create_bookmarks(&self.client, self.collection_id, drafts).await
    }

    async fn search_by_link(&self, link: &RepoUrl) -> Result<Vec<BookmarkRecord>> {
        bookmarks::find_link(&self.client, self.collection_id, link).await
    }

    async fn delete_bookmark(&self, id: BookmarkId) -> Result<()> {
        bookmarks::delete_bookmark(&self.client, id).await
    }
}
