//! GithubStarSource - IStarSource implementation for the GitHub API
//!
//! Thin adapter over [`GithubClient`] and [`stars::fetch_all_stars`].

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use starsync_core::domain::Snapshot;
use starsync_core::ports::IStarSource;

use crate::client::GithubClient;
use crate::stars;

/// Star source backed by the authenticated user's GitHub stars
pub struct GithubStarSource {
    client: GithubClient,
}

impl GithubStarSource {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GithubClient {
        &self.client
    }
}

#[async_trait]
impl IStarSource for GithubStarSource {
    async fn fetch_all(&self) -> Result<Snapshot> {
        let snapshot = stars::fetch_all_stars(&self.client).await?;
        info!(count = snapshot.len(), "Fetched starred repositories from GitHub");
        Ok(snapshot)
    }
}
