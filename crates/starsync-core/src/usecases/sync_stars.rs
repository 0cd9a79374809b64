//! Star synchronization use case
//!
//! One run of the pipeline: load the archived snapshot, fetch the current
//! stars, reconcile the two, persist the new snapshot, publish the archive
//! change and finally project the diff onto the bookmark service.
//!
//! The archive is written before anything is projected. A projection
//! failure therefore never loses the diff of this run, and the next run
//! (or a retry) repeats the projection idempotently.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{EmptySnapshotPolicy, ProjectionScope};
use crate::domain::{ArchiveChange, DiffResult, Snapshot};
use crate::ports::{IArchivePublisher, ISnapshotStore, IStarSource};
use crate::usecases::project_bookmarks::{
    AdditionReport, ProjectBookmarksUseCase, RemovalReport,
};
use crate::usecases::reconcile::Reconciler;

/// Run-time switches for [`SyncStarsUseCase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub empty_snapshot: EmptySnapshotPolicy,
    pub projection: ProjectionScope,
    /// Publish the archive change when a publisher is attached
    pub publish: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            empty_snapshot: EmptySnapshotPolicy::Abort,
            projection: ProjectionScope::Additions,
            publish: true,
        }
    }
}

/// What happened to the archive change after it was persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "error")]
pub enum PublishOutcome {
    /// Nothing changed, publishing is disabled, or no publisher is attached
    Skipped,
    Published,
    Failed(String),
}

/// Summary of one completed run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub prior_total: usize,
    pub current_total: usize,
    pub added: usize,
    pub removed: usize,
    pub published: PublishOutcome,
    pub additions: AdditionReport,
    pub removals: RemovalReport,
    pub duration_ms: u64,
}

impl SyncReport {
    /// True when any chunk or removal failed to project
    pub fn has_projection_failures(&self) -> bool {
        self.additions.failed_chunks > 0 || self.removals.failed > 0
    }
}

/// Diff computed without persisting or projecting anything
#[derive(Debug, Clone, Serialize)]
pub struct SyncPreview {
    pub prior_total: usize,
    pub current_total: usize,
    pub diff: DiffResult,
}

/// Read-only half of a run: load, fetch and reconcile
///
/// Needs neither the bookmark service nor the publisher, so a dry run can
/// be made with the hosting platform's credentials alone.
pub struct PreviewStarsUseCase {
    star_source: Arc<dyn IStarSource + Send + Sync>,
    snapshot_store: Arc<dyn ISnapshotStore + Send + Sync>,
    empty_snapshot: EmptySnapshotPolicy,
}

impl PreviewStarsUseCase {
    pub fn new(
        star_source: Arc<dyn IStarSource + Send + Sync>,
        snapshot_store: Arc<dyn ISnapshotStore + Send + Sync>,
        empty_snapshot: EmptySnapshotPolicy,
    ) -> Self {
        Self {
            star_source,
            snapshot_store,
            empty_snapshot,
        }
    }

    /// Computes the diff the next run would apply
    ///
    /// # Errors
    ///
    /// Fails on load, fetch, or an empty fetch against a non-empty archive
    /// under [`EmptySnapshotPolicy::Abort`].
    pub async fn execute(&self) -> Result<SyncPreview> {
        let (prior, current) = self.load_and_fetch().await?;
        let diff = Reconciler::diff(&prior, &current);
        Ok(SyncPreview {
            prior_total: prior.len(),
            current_total: current.len(),
            diff,
        })
    }

    async fn load_and_fetch(&self) -> Result<(Snapshot, Snapshot)> {
        let prior = self
            .snapshot_store
            .load()
            .await
            .context("Failed to load archived snapshot")?;
        if prior.is_empty() {
            info!("No archived snapshot, treating as first run");
        }

        let current = self
            .star_source
            .fetch_all()
            .await
            .context("Failed to fetch starred repositories")?;

        if current.is_empty() && !prior.is_empty() {
            match self.empty_snapshot {
                EmptySnapshotPolicy::Abort => bail!(
                    "Fetched no starred repositories while the archive holds {}; \
                     refusing to treat everything as unstarred",
                    prior.len()
                ),
                EmptySnapshotPolicy::RemoveAll => warn!(
                    archived = prior.len(),
                    "Fetched no starred repositories, every archived item will be removed"
                ),
            }
        }

        Ok((prior, current))
    }
}

/// Use case driving a complete synchronization run
pub struct SyncStarsUseCase {
    star_source: Arc<dyn IStarSource + Send + Sync>,
    snapshot_store: Arc<dyn ISnapshotStore + Send + Sync>,
    projector: ProjectBookmarksUseCase,
    publisher: Option<Arc<dyn IArchivePublisher + Send + Sync>>,
    options: SyncOptions,
}

impl SyncStarsUseCase {
    /// Creates a new SyncStarsUseCase
    ///
    /// # Arguments
    ///
    /// * `star_source` - Source of the current starred set
    /// * `snapshot_store` - Durable store for the archived snapshot
    /// * `projector` - Bookmark projection bound to the target collection
    /// * `options` - Empty-fetch policy, projection scope and publish switch
    pub fn new(
        star_source: Arc<dyn IStarSource + Send + Sync>,
        snapshot_store: Arc<dyn ISnapshotStore + Send + Sync>,
        projector: ProjectBookmarksUseCase,
        options: SyncOptions,
    ) -> Self {
        Self {
            star_source,
            snapshot_store,
            projector,
            publisher: None,
            options,
        }
    }

    /// Attaches a publisher for the archive change
    pub fn with_publisher(mut self, publisher: Arc<dyn IArchivePublisher + Send + Sync>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Loads, fetches and reconciles without side effects
    ///
    /// Applies the same empty-fetch guard as [`execute`](Self::execute), so
    /// a preview fails exactly where a real run would.
    pub async fn preview(&self) -> Result<SyncPreview> {
        self.reader().execute().await
    }

    /// Runs one synchronization
    ///
    /// Steps, in order:
    /// 1. Load the prior snapshot (missing archive means first run)
    /// 2. Fetch the current snapshot
    /// 3. Reconcile
    /// 4. Persist the current snapshot
    /// 5. Publish the archive change, when there is one
    /// 6. Project additions, then removals
    ///
    /// # Errors
    ///
    /// Fails on load, fetch, the empty-fetch guard, or persistence. Nothing
    /// is persisted or projected in those cases. Publishing and projection
    /// failures are reported in the [`SyncReport`] instead.
    pub async fn execute(&self) -> Result<SyncReport> {
        let started = Instant::now();
        let (prior, current) = self.load_and_fetch().await?;

        let diff = Reconciler::diff(&prior, &current);
        info!(
            prior = prior.len(),
            current = current.len(),
            added = diff.additions.len(),
            removed = diff.removals.len(),
            "Reconciled starred repositories"
        );

        self.snapshot_store
            .save(&current)
            .await
            .context("Failed to persist snapshot")?;
        debug!(items = current.len(), "Snapshot persisted");

        let change = ArchiveChange::from_diff(&diff, Utc::now().date_naive());
        let published = self.publish(&change).await;

        let additions = match self.options.projection {
            ProjectionScope::Additions => self.projector.apply_additions(&diff.additions).await,
            ProjectionScope::All => self.projector.apply_additions(current.items()).await,
        };
        let removals = self.projector.apply_removals(&diff.removals).await;

        let report = SyncReport {
            prior_total: prior.len(),
            current_total: current.len(),
            added: diff.additions.len(),
            removed: diff.removals.len(),
            published,
            additions,
            removals,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        if report.has_projection_failures() {
            warn!(
                failed_chunks = report.additions.failed_chunks,
                failed_removals = report.removals.failed,
                "Sync completed with projection failures"
            );
        } else {
            info!(
                added = report.added,
                removed = report.removed,
                imported = report.additions.imported,
                deleted = report.removals.deleted,
                duration_ms = report.duration_ms,
                "Sync completed"
            );
        }

        Ok(report)
    }

    fn reader(&self) -> PreviewStarsUseCase {
        PreviewStarsUseCase::new(
            self.star_source.clone(),
            self.snapshot_store.clone(),
            self.options.empty_snapshot,
        )
    }

    async fn load_and_fetch(&self) -> Result<(Snapshot, Snapshot)> {
        self.reader().load_and_fetch().await
    }

    async fn publish(&self, change: &ArchiveChange) -> PublishOutcome {
        let publisher = match &self.publisher {
            Some(p) if self.options.publish => p,
            _ => return PublishOutcome::Skipped,
        };
        if change.is_empty() {
            debug!("Archive unchanged, nothing to publish");
            return PublishOutcome::Skipped;
        }

        match publisher.publish(change).await {
            Ok(()) => {
                info!(message = %change.commit_message(), "Published archive change");
                PublishOutcome::Published
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Failed to publish archive change");
                PublishOutcome::Failed(format!("{e:#}"))
            }
        }
    }
}
