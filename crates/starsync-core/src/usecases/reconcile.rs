//! Snapshot reconciliation
//!
//! Computes what was starred and unstarred between the archived snapshot
//! and a freshly fetched one. Membership is decided by identity alone, so
//! metadata drift (new description, changed topics) never shows up as a
//! removal plus an addition.

use crate::domain::{DiffResult, Snapshot};

/// Identity-keyed set difference between two snapshots
pub struct Reconciler;

impl Reconciler {
    /// Diffs `current` against `prior`
    ///
    /// - additions: items in `current` whose identity is absent from `prior`
    /// - removals: items in `prior` whose identity is absent from `current`
    ///
    /// Runs in O(n + m) using hash lookups and does not depend on the
    /// order of either snapshot. An empty `prior` (first run) yields only
    /// additions. An empty `current` yields every prior item as a
    /// removal; deciding whether that is acceptable is the caller's job.
    pub fn diff(prior: &Snapshot, current: &Snapshot) -> DiffResult {
        let prior_index = prior.index();
        let current_index = current.index();

        let additions = current
            .iter()
            .filter(|item| !prior_index.contains_key(item.identity()))
            .cloned()
            .collect();

        let removals = prior
            .iter()
            .filter(|item| !current_index.contains_key(item.identity()))
            .cloned()
            .collect();

        DiffResult {
            additions,
            removals,
        }
    }
}
