//! Snapshot store port (driven/secondary port)
//!
//! Interface for persisting the last known starred-set between runs.

use crate::domain::Snapshot;

/// Port trait for the local archive
///
/// ## Implementation Notes
///
/// - `load` returns [`Snapshot::empty`] when no archive exists yet. Any
///   other failure (unreadable, unparsable) is an error.
/// - `save` fully replaces the previous archive and must be atomic: a
///   crash mid-write must leave either the old or the new archive.
/// - `save` writes items most recently starred first.
#[async_trait::async_trait]
pub trait ISnapshotStore: Send + Sync {
    /// Loads the last persisted snapshot
    async fn load(&self) -> anyhow::Result<Snapshot>;

    /// Persists `snapshot`, replacing the previous one
    async fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}
