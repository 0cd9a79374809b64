//! Starsync Archive - durable snapshot storage and publishing
//!
//! ## Modules
//!
//! - [`store`] - JSON file snapshot store with atomic replacement
//! - [`git`] - Commits (and optionally pushes) the archive after a change

pub mod git;
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the archive adapters
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Reading or writing the archive file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive exists but is not a valid snapshot
    #[error("Corrupt archive {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be serialized
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The git executable could not be started
    #[error("Failed to run git: {0}")]
    GitUnavailable(#[source] std::io::Error),

    /// A git command exited unsuccessfully
    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}
