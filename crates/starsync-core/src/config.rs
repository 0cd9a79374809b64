//! Configuration module for Starsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! Credentials never live in the file; they are read from the environment
//! variables the file names.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Largest batch the bookmark service accepts in one request.
pub const MAX_CHUNK_SIZE: usize = 100;

/// Largest page size the hosting platform accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Environment variable consulted when `bookmarks.collection_id` is unset.
pub const COLLECTION_ID_ENV: &str = "RAINDROP_COLLECTION_ID";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Starsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub github: GithubConfig,
    pub bookmarks: BookmarksConfig,
    pub publish: PublishConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Local archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Path of the JSON archive, relative paths resolve against the working directory.
    pub path: PathBuf,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Base URL of the REST API.
    pub api_url: String,
    /// Stars requested per page (1..=100).
    pub per_page: u32,
    /// Environment variable holding the access token.
    pub token_env: String,
}

/// Bookmark service (Raindrop.io) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarksConfig {
    /// Base URL of the REST API.
    pub api_url: String,
    /// Target collection. Falls back to `RAINDROP_COLLECTION_ID` when unset.
    pub collection_id: Option<i64>,
    /// Environment variable holding the access token.
    pub token_env: String,
    /// Bookmarks per existence check / create request (1..=100).
    pub chunk_size: usize,
    /// Tags attached to every created bookmark.
    pub tags: Vec<String>,
    /// Which starred items go through the import path on each run.
    pub projection: ProjectionScope,
}

/// Version-control publishing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Commit the archive after a run that changed it.
    pub enabled: bool,
    /// Push after committing. Ignored when `enabled` is false.
    pub push: bool,
    /// Committer name; left untouched in the repository config when `None`.
    pub user_name: Option<String>,
    /// Committer email; left untouched in the repository config when `None`.
    pub user_email: Option<String>,
}

/// Reconciliation policy settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// What to do when the fetch is empty but the archive is not.
    pub empty_snapshot: EmptySnapshotPolicy,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

/// Handling of an empty fetch against a non-empty archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySnapshotPolicy {
    /// Refuse to reconcile; nothing is persisted or projected.
    #[default]
    Abort,
    /// Treat it as "nothing starred": every archived item becomes a removal.
    RemoveAll,
}

/// Which items the import path receives on each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionScope {
    /// Only the additions of this run.
    #[default]
    Additions,
    /// The whole current snapshot; existing links are skipped.
    All,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` when it exists; use [`Config::default`] when it does not.
    ///
    /// Unlike a silent fallback, a file that exists but cannot be parsed is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/starsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("starsync")
            .join("config.yaml")
    }

    /// Fill unset values from the environment.
    ///
    /// Currently only `bookmarks.collection_id` from `RAINDROP_COLLECTION_ID`.
    /// An unparsable variable is ignored here and reported by [`Config::validate`]
    /// as a missing collection id.
    pub fn with_env_overrides(mut self) -> Self {
        if self.bookmarks.collection_id.is_none() {
            self.bookmarks.collection_id = std::env::var(COLLECTION_ID_ENV)
                .ok()
                .and_then(|v| v.trim().parse().ok());
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("starred-repos.json"),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            per_page: MAX_PER_PAGE,
            token_env: "GH_TOKEN".to_string(),
        }
    }
}

impl Default for BookmarksConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.raindrop.io/rest/v1".to_string(),
            collection_id: None,
            token_env: "RAINDROP_TOKEN".to_string(),
            chunk_size: MAX_CHUNK_SIZE,
            tags: vec!["github".to_string()],
            projection: ProjectionScope::Additions,
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            push: true,
            user_name: None,
            user_email: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"bookmarks.chunk_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ValidationError {
                field: field.into(),
                message,
            });
        };

        // --- archive ---
        if self.archive.path.as_os_str().is_empty() {
            push("archive.path", "must not be empty".into());
        }

        // --- github ---
        if !is_http_url(&self.github.api_url) {
            push(
                "github.api_url",
                format!("must be an http(s) URL, got '{}'", self.github.api_url),
            );
        }
        if self.github.per_page == 0 || self.github.per_page > MAX_PER_PAGE {
            push("github.per_page", format!("must be in range 1..={MAX_PER_PAGE}"));
        }
        if self.github.token_env.trim().is_empty() {
            push("github.token_env", "must name an environment variable".into());
        }

        // --- bookmarks ---
        if !is_http_url(&self.bookmarks.api_url) {
            push(
                "bookmarks.api_url",
                format!("must be an http(s) URL, got '{}'", self.bookmarks.api_url),
            );
        }
        if self.bookmarks.collection_id.is_none() {
            push(
                "bookmarks.collection_id",
                format!("must be set (or provide {COLLECTION_ID_ENV})"),
            );
        }
        if self.bookmarks.token_env.trim().is_empty() {
            push("bookmarks.token_env", "must name an environment variable".into());
        }
        if self.bookmarks.chunk_size == 0 || self.bookmarks.chunk_size > MAX_CHUNK_SIZE {
            push(
                "bookmarks.chunk_size",
                format!("must be in range 1..={MAX_CHUNK_SIZE}"),
            );
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            push(
                "logging.level",
                format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            );
        }

        errors
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Access tokens for both remote systems.
///
/// Opaque to the core; only adapters look inside.
#[derive(Clone)]
pub struct Credentials {
    pub github_token: String,
    pub bookmarks_token: String,
}

impl Credentials {
    /// Read both tokens from the environment variables named in `config`.
    pub fn from_env(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            github_token: token_from_env(&config.github.token_env)?,
            bookmarks_token: token_from_env(&config.bookmarks.token_env)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &"<redacted>")
            .field("bookmarks_token", &"<redacted>")
            .finish()
    }
}

/// Read a non-empty token from the environment variable `var`.
pub fn token_from_env(var: &str) -> anyhow::Result<String> {
    let value = std::env::var(var)
        .with_context(|| format!("Environment variable {var} is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Environment variable {var} is empty");
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use starsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .archive_path(PathBuf::from("stars.json"))
///     .bookmarks_collection_id(42)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder pre-filled with default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // -- archive --

    pub fn archive_path(mut self, path: PathBuf) -> Self {
        self.config.archive.path = path;
        self
    }

    // -- github --

    pub fn github_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.github.api_url = url.into();
        self
    }

    pub fn github_per_page(mut self, n: u32) -> Self {
        self.config.github.per_page = n;
        self
    }

    pub fn github_token_env(mut self, var: impl Into<String>) -> Self {
        self.config.github.token_env = var.into();
        self
    }

    // -- bookmarks --

    pub fn bookmarks_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.bookmarks.api_url = url.into();
        self
    }

    pub fn bookmarks_collection_id(mut self, id: i64) -> Self {
        self.config.bookmarks.collection_id = Some(id);
        self
    }

    pub fn bookmarks_token_env(mut self, var: impl Into<String>) -> Self {
        self.config.bookmarks.token_env = var.into();
        self
    }

    pub fn bookmarks_chunk_size(mut self, n: usize) -> Self {
        self.config.bookmarks.chunk_size = n;
        self
    }

    pub fn bookmarks_tags(mut self, tags: Vec<String>) -> Self {
        self.config.bookmarks.tags = tags;
        self
    }

    pub fn bookmarks_projection(mut self, scope: ProjectionScope) -> Self {
        self.config.bookmarks.projection = scope;
        self
    }

    // -- publish --

    pub fn publish_enabled(mut self, enabled: bool) -> Self {
        self.config.publish.enabled = enabled;
        self
    }

    pub fn publish_push(mut self, push: bool) -> Self {
        self.config.publish.push = push;
        self
    }

    pub fn publish_identity(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.config.publish.user_name = Some(name.into());
        self.config.publish.user_email = Some(email.into());
        self
    }

    // -- sync --

    pub fn sync_empty_snapshot(mut self, policy: EmptySnapshotPolicy) -> Self {
        self.config.sync.empty_snapshot = policy;
        self
    }

    // -- logging --

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_json(mut self, json: bool) -> Self {
        self.config.logging.json = json;
        self
    }

    /// Consume the builder and return the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Consume the builder, validate, and return the [`Config`] or errors.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
