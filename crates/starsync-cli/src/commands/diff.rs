//! Diff command - Compare the archive with the live starred set
//!
//! Read-only: nothing is written, committed or projected, and only the
//! GitHub token is needed.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use starsync_core::config::EmptySnapshotPolicy;
use starsync_core::ports::{ISnapshotStore, IStarSource};
use starsync_core::usecases::{Reconciler, SyncPreview};

use super::sync::print_preview;
use super::{snapshot_store, star_source_from_env, CommandContext, ConfigScope};

#[derive(Debug, Args)]
pub struct DiffCommand {}

impl DiffCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config(ConfigScope::StarsOnly)?;

        let store = snapshot_store(&config);
        let source = star_source_from_env(&config)?;

        let prior = store.load().await.context("Failed to load archived snapshot")?;
        let current = source
            .fetch_all()
            .await
            .context("Failed to fetch starred repositories")?;

        if current.is_empty() && !prior.is_empty() {
            formatter.warn(&empty_fetch_warning(config.sync.empty_snapshot, prior.len()));
        }

        let preview = SyncPreview {
            prior_total: prior.len(),
            current_total: current.len(),
            diff: Reconciler::diff(&prior, &current),
        };
        info!(
            added = preview.diff.additions.len(),
            removed = preview.diff.removals.len(),
            "Diff computed"
        );

        print_preview(formatter.as_ref(), ctx.is_json(), &preview)
    }
}

/// What `sync` would do with an empty fetch under `policy`
fn empty_fetch_warning(policy: EmptySnapshotPolicy, archived: usize) -> String {
    match policy {
        EmptySnapshotPolicy::Abort => format!(
            "GitHub returned no starred repositories; sync will refuse to run \
             (sync.empty_snapshot: abort, {archived} archived)"
        ),
        EmptySnapshotPolicy::RemoveAll => format!(
            "GitHub returned no starred repositories; sync will remove all {archived} \
             archived repositories and their bookmarks (sync.empty_snapshot: remove_all)"
        ),
    }
}
