//! Sync command - Archive starred repositories and project them to Raindrop
//!
//! Provides the `starsync sync` CLI command which:
//! 1. Loads and validates configuration, then reads both tokens
//! 2. Wires the GitHub source, JSON archive, Raindrop projection and git publisher
//! 3. Runs one synchronization
//! 4. Displays the run summary
//!
//! `--dry-run` only reads the archive and GitHub, so it needs neither the
//! Raindrop token nor a collection id.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use starsync_core::config::{Config, Credentials, ProjectionScope};
use starsync_core::usecases::{
    PreviewStarsUseCase, PublishOutcome, SyncOptions, SyncPreview, SyncReport, SyncStarsUseCase,
};

use super::{
    archive_publisher, bookmark_projector, snapshot_store, star_source, star_source_from_env,
    CommandContext, ConfigScope,
};
use crate::output::{count, OutputFormatter};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Show what would change without writing, publishing or projecting (GitHub token only)
    #[arg(long)]
    pub dry_run: bool,

    /// Send every starred repository through the import path, not only new ones
    #[arg(long)]
    pub all: bool,

    /// Do not commit or push the archive
    #[arg(long)]
    pub no_publish: bool,
}

impl SyncCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        if self.dry_run {
            return self.execute_dry_run(ctx).await;
        }
        let formatter = ctx.formatter();

        let config = ctx.load_config(ConfigScope::Full)?;
        let credentials = Credentials::from_env(&config).context("Missing credentials")?;
        let options = self.options(&config);

        info!(
            archive = %config.archive.path.display(),
            projection = ?options.projection,
            publish = options.publish,
            "Starting sync"
        );

        let repo_dir = std::env::current_dir().context("Failed to resolve working directory")?;
        let use_case = SyncStarsUseCase::new(
            star_source(&config, &credentials.github_token),
            snapshot_store(&config),
            bookmark_projector(&config, &credentials)?,
            options,
        )
        .with_publisher(std::sync::Arc::new(archive_publisher(&config, &repo_dir)));

        let report = use_case.execute().await?;
        print_report(formatter.as_ref(), ctx.is_json(), &report)
    }

    /// Preview only; reads the archive and GitHub, never Raindrop
    async fn execute_dry_run(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config(ConfigScope::StarsOnly)?;

        info!(archive = %config.archive.path.display(), "Starting dry run");
        formatter.info("Dry run - nothing will be written, published or projected");

        let preview = PreviewStarsUseCase::new(
            star_source_from_env(&config)?,
            snapshot_store(&config),
            config.sync.empty_snapshot,
        )
        .execute()
        .await?;
        print_preview(formatter.as_ref(), ctx.is_json(), &preview)
    }

    /// Config values with command-line flags applied on top
    fn options(&self, config: &Config) -> SyncOptions {
        SyncOptions {
            empty_snapshot: config.sync.empty_snapshot,
            projection: if self.all {
                ProjectionScope::All
            } else {
                config.bookmarks.projection
            },
            publish: config.publish.enabled && !self.no_publish,
        }
    }
}

pub(crate) fn print_preview(
    formatter: &dyn OutputFormatter,
    json: bool,
    preview: &SyncPreview,
) -> Result<()> {
    if json {
        let value = serde_json::to_value(preview).context("Failed to serialize preview")?;
        formatter.print_json(&value);
        return Ok(());
    }

    let diff = &preview.diff;
    if diff.is_empty() {
        formatter.success(&format!(
            "No changes ({} archived)",
            count(preview.prior_total, "repository", "repositories")
        ));
        return Ok(());
    }

    formatter.success(&format!(
        "{} starred, {} unstarred",
        diff.additions.len(),
        diff.removals.len()
    ));
    formatter.info(&format!("Archived: {}", preview.prior_total));
    formatter.info(&format!("Current:  {}", preview.current_total));
    for item in &diff.additions {
        formatter.info(&format!("+ {} ({})", item.full_name, item.html_url));
    }
    for item in &diff.removals {
        formatter.info(&format!("- {} ({})", item.full_name, item.html_url));
    }
    Ok(())
}

fn print_report(formatter: &dyn OutputFormatter, json: bool, report: &SyncReport) -> Result<()> {
    if json {
        let value = serde_json::to_value(report).context("Failed to serialize sync report")?;
        formatter.print_json(&value);
        return Ok(());
    }

    let duration = if report.duration_ms >= 1000 {
        format!("{:.1}s", report.duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", report.duration_ms)
    };

    if report.added == 0 && report.removed == 0 {
        formatter.success(&format!(
            "Already up to date ({})",
            count(report.current_total, "repository", "repositories")
        ));
    } else {
        formatter.success(&format!(
            "Sync completed in {}: +{} starred, -{} unstarred",
            duration, report.added, report.removed
        ));
    }

    formatter.info(&format!(
        "Archive:   {} -> {}",
        report.prior_total, report.current_total
    ));

    let additions = &report.additions;
    formatter.info(&format!(
        "Imported:  {} (skipped {} existing)",
        count(additions.imported, "bookmark", "bookmarks"),
        additions.skipped_existing
    ));

    let removals = &report.removals;
    formatter.info(&format!(
        "Deleted:   {} ({} already absent)",
        count(removals.deleted, "bookmark", "bookmarks"),
        removals.not_found
    ));

    match &report.published {
        PublishOutcome::Published => formatter.info("Published: archive committed"),
        PublishOutcome::Skipped => formatter.info("Published: skipped"),
        PublishOutcome::Failed(error) => {
            formatter.warn(&format!("Publishing the archive failed: {}", error))
        }
    }

    if report.has_projection_failures() {
        formatter.warn(&format!(
            "{} and {} failed; rerun to retry",
            count(additions.failed_chunks, "import chunk", "import chunks"),
            count(removals.failed, "removal", "removals")
        ));
        for error in additions.errors.iter().chain(&removals.errors) {
            formatter.info(&format!("  {}", error));
        }
    }

    Ok(())
}
