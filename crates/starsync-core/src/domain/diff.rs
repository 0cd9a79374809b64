//! Reconciliation output

use std::collections::HashSet;

use serde::Serialize;

use super::newtypes::RepoUrl;
use super::starred::StarredItem;

/// Additions and removals between a prior and a current snapshot
///
/// Both collections are keyed by identity and carry no meaningful order.
/// Additions hold the current version of each item; removals hold the
/// version last seen in the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// Items starred since the prior snapshot
    pub additions: Vec<StarredItem>,
    /// Items unstarred since the prior snapshot
    pub removals: Vec<StarredItem>,
}

impl DiffResult {
    /// Returns true if nothing was added or removed
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Identities of the added items
    pub fn addition_ids(&self) -> HashSet<&RepoUrl> {
        self.additions.iter().map(StarredItem::identity).collect()
    }

    /// Identities of the removed items
    pub fn removal_ids(&self) -> HashSet<&RepoUrl> {
        self.removals.iter().map(StarredItem::identity).collect()
    }
}
