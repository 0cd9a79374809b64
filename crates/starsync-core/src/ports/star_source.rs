//! Star source port (driven/secondary port)
//!
//! Interface for obtaining the complete starred-set of the authenticated
//! user from the code-hosting platform.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because transport and API errors are
//!   adapter-specific and every one of them is fatal to the run.
//! - There is no incremental mode: reconciliation needs the whole set.

use crate::domain::Snapshot;

/// Port trait for the remote source of truth
#[async_trait::async_trait]
pub trait IStarSource: Send + Sync {
    /// Fetches every starred repository, following all pages
    ///
    /// Each item carries the time the star was created, not the fetch
    /// time. Implementations must never return a partial listing: any
    /// page failure is an error, because a truncated snapshot would
    /// turn real stars into removals.
    async fn fetch_all(&self) -> anyhow::Result<Snapshot>;
}
