//! Domain entities
//!
//! This module contains the core domain types for Starsync:
//! - Newtypes for repository identities and bookmark ids
//! - Starred items and snapshots of the starred-set
//! - Diff results produced by reconciliation
//! - Bookmark payloads and records
//! - Archive change summaries for publishing

pub mod bookmark;
pub mod change;
pub mod diff;
pub mod errors;
pub mod newtypes;
pub mod snapshot;
pub mod starred;

// Re-export commonly used types
pub use bookmark::{BookmarkDraft, BookmarkRecord};
pub use change::ArchiveChange;
pub use diff::DiffResult;
pub use errors::DomainError;
pub use newtypes::{BookmarkId, RepoUrl};
pub use snapshot::Snapshot;
pub use starred::StarredItem;
