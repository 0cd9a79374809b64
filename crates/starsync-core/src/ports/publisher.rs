//! Archive publisher port (driven/secondary port)
//!
//! Side effect run after the archive has been written with a non-empty
//! change, e.g. committing and pushing the archive file.

use crate::domain::ArchiveChange;

/// Port trait for publishing an updated archive
///
/// Failures are reported to the caller, which logs them; they never
/// fail a run.
#[async_trait::async_trait]
pub trait IArchivePublisher: Send + Sync {
    /// Publishes the archive that was just written
    async fn publish(&self, change: &ArchiveChange) -> anyhow::Result<()>;
}
