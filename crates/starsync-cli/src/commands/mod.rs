//! CLI subcommands and the adapter wiring they share

pub mod config;
pub mod diff;
pub mod sync;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use starsync_archive::git::{GitIdentity, GitPublisher};
use starsync_archive::store::JsonSnapshotStore;
use starsync_core::config::{token_from_env, Config, Credentials};
use starsync_core::usecases::ProjectBookmarksUseCase;
use starsync_github::client::GithubClient;
use starsync_github::provider::GithubStarSource;
use starsync_raindrop::client::RaindropClient;
use starsync_raindrop::provider::RaindropBookmarkService;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Global flags every subcommand runs with
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config_path: PathBuf,
}

/// Which config sections a command needs to be valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// Every section
    Full,
    /// Everything except the bookmark service
    StarsOnly,
}

impl CommandContext {
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format, self.quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Loads the config file (defaults when absent), applies environment
    /// overrides and fails on any validation error within `scope`
    pub fn load_config(&self, scope: ConfigScope) -> Result<Config> {
        let config = Config::load_or_default(&self.config_path)?.with_env_overrides();
        debug!(config_path = %self.config_path.display(), "Loaded configuration");

        let errors: Vec<String> = config
            .validate()
            .into_iter()
            .filter(|e| scope == ConfigScope::Full || !e.field.starts_with("bookmarks."))
            .map(|e| e.to_string())
            .collect();
        if !errors.is_empty() {
            anyhow::bail!(
                "Invalid configuration ({}): {}",
                self.config_path.display(),
                errors.join("; ")
            );
        }
        Ok(config)
    }
}

/// GitHub star source authenticated with the configured token
pub fn star_source(config: &Config, token: &str) -> Arc<GithubStarSource> {
    let client = GithubClient::with_base_url(token, config.github.api_url.as_str())
        .with_per_page(config.github.per_page);
    Arc::new(GithubStarSource::new(client))
}

/// Same as [`star_source`], reading only the GitHub token
pub fn star_source_from_env(config: &Config) -> Result<Arc<GithubStarSource>> {
    let token = token_from_env(&config.github.token_env).context("Missing GitHub credentials")?;
    Ok(star_source(config, &token))
}

pub fn snapshot_store(config: &Config) -> Arc<JsonSnapshotStore> {
    Arc::new(JsonSnapshotStore::new(config.archive.path.clone()))
}

/// Bookmark projection bound to the configured Raindrop collection
pub fn bookmark_projector(config: &Config, credentials: &Credentials) -> Result<ProjectBookmarksUseCase> {
    let collection_id = config
        .bookmarks
        .collection_id
        .context("bookmarks.collection_id is not set")?;
    let client = RaindropClient::with_base_url(
        credentials.bookmarks_token.as_str(),
        config.bookmarks.api_url.as_str(),
    );
    let service = Arc::new(RaindropBookmarkService::new(client, collection_id));
    Ok(ProjectBookmarksUseCase::new(
        service,
        config.bookmarks.chunk_size,
        config.bookmarks.tags.clone(),
    ))
}

/// Git publisher for the archive, run from `repo_dir`
pub fn archive_publisher(config: &Config, repo_dir: &Path) -> GitPublisher {
    let publisher = GitPublisher::new(repo_dir, config.archive.path.clone())
        .with_push(config.publish.push);

    match (&config.publish.user_name, &config.publish.user_email) {
        (Some(name), Some(email)) => publisher.with_identity(GitIdentity {
            name: name.clone(),
            email: email.clone(),
        }),
        _ => publisher,
    }
}
