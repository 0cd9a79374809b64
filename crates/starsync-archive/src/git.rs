//! Git publisher
//!
//! Commits the archive file after a run that changed it and optionally
//! pushes. Runs the `git` executable in the repository directory, the
//! same way a CI job would.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use starsync_core::domain::ArchiveChange;
use starsync_core::ports::IArchivePublisher;

use crate::ArchiveError;

/// Committer identity written to the repository's local config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

/// Publishes archive changes as git commits
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_dir: PathBuf,
    archive: PathBuf,
    identity: Option<GitIdentity>,
    push: bool,
}

impl GitPublisher {
    /// Creates a publisher committing `archive` inside `repo_dir`
    ///
    /// `archive` may be absolute or relative to `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>, archive: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            archive: archive.into(),
            identity: None,
            push: false,
        }
    }

    /// Sets the committer identity before committing
    pub fn with_identity(mut self, identity: GitIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Pushes to the default remote after committing
    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Stages the archive and commits it with the change's message
    ///
    /// Returns `Ok(false)` without committing when staging produced no
    /// difference (the archive content did not actually change).
    pub async fn commit(&self, change: &ArchiveChange) -> Result<bool, ArchiveError> {
        if let Some(identity) = &self.identity {
            self.git(&["config", "user.name", identity.name.as_str()]).await?;
            self.git(&["config", "user.email", identity.email.as_str()]).await?;
        }

        let archive = self.archive.to_string_lossy().into_owned();
        self.git(&["add", "--", archive.as_str()]).await?;

        if self.nothing_staged(&archive).await? {
            debug!(archive = %archive, "Archive unchanged in git, skipping commit");
            return Ok(false);
        }

        let message = change.commit_message();
        self.git(&["commit", "-m", message.as_str(), "--", archive.as_str()]).await?;
        info!(message = %message, "Committed archive");

        if self.push {
            self.git(&["push"]).await?;
            info!("Pushed archive commit");
        }
        Ok(true)
    }

    /// `git diff --cached --quiet` exits 1 when something is staged
    async fn nothing_staged(&self, archive: &str) -> Result<bool, ArchiveError> {
        let output = Command::new("git")
            .args(["diff", "--cached", "--quiet", "--", archive])
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(ArchiveError::GitUnavailable)?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(ArchiveError::Git {
                command: "diff --cached".into(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String, ArchiveError> {
        debug!(?args, dir = %self.repo_dir.display(), "Running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(ArchiveError::GitUnavailable)?;

        if !output.status.success() {
            return Err(ArchiveError::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl IArchivePublisher for GitPublisher {
    async fn publish(&self, change: &ArchiveChange) -> anyhow::Result<()> {
        self.commit(change).await?;
        Ok(())
    }
}
