//! Point-in-time listing of starred items

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::newtypes::RepoUrl;
use super::starred::StarredItem;

/// Complete listing of starred items at one point in time
///
/// Identities are unique within a snapshot: [`Snapshot::from_items`]
/// collapses duplicates, keeping the first occurrence. Item order is a
/// presentation concern; call [`Snapshot::sort_by_recency`] before
/// writing the snapshot anywhere a human will read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    items: Vec<StarredItem>,
}

impl Snapshot {
    /// An empty snapshot (nothing starred / first run)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot, dropping later items whose identity was already seen
    pub fn from_items(items: Vec<StarredItem>) -> Self {
        let mut seen: HashSet<RepoUrl> = HashSet::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());

        for item in items {
            if seen.insert(item.html_url.clone()) {
                unique.push(item);
            } else {
                warn!(
                    identity = %item.html_url,
                    name = %item.full_name,
                    "Duplicate identity in snapshot, keeping first occurrence"
                );
            }
        }

        Self { items: unique }
    }

    /// The items in their current order
    pub fn items(&self) -> &[StarredItem] {
        &self.items
    }

    /// Consumes the snapshot, returning its items
    pub fn into_items(self) -> Vec<StarredItem> {
        self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &StarredItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if an item with this identity is present
    pub fn contains(&self, identity: &RepoUrl) -> bool {
        self.items.iter().any(|item| item.identity() == identity)
    }

    /// Builds an `identity -> item` lookup
    pub fn index(&self) -> HashMap<&RepoUrl, &StarredItem> {
        self.items
            .iter()
            .map(|item| (item.identity(), item))
            .collect()
    }

    /// Sorts most recently starred first
    ///
    /// Items starred at the same instant are ordered by identity so the
    /// result is deterministic.
    pub fn sort_by_recency(&mut self) {
        self.items.sort_by(|a, b| {
            b.starred_at
                .cmp(&a.starred_at)
                .then_with(|| a.html_url.cmp(&b.html_url))
        });
    }

    /// Consuming variant of [`Snapshot::sort_by_recency`]
    #[must_use]
    pub fn sorted_by_recency(mut self) -> Self {
        self.sort_by_recency();
        self
    }
}

impl From<Vec<StarredItem>> for Snapshot {
    fn from(items: Vec<StarredItem>) -> Self {
        Self::from_items(items)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a StarredItem;
    type IntoIter = std::slice::Iter<'a, StarredItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
