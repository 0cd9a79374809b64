//! Archive change summary handed to the publisher

use chrono::NaiveDate;

use super::diff::DiffResult;

/// Net change recorded by one archive write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveChange {
    pub added: usize,
    pub removed: usize,
    pub date: NaiveDate,
}

impl ArchiveChange {
    pub fn from_diff(diff: &DiffResult, date: NaiveDate) -> Self {
        Self {
            added: diff.additions.len(),
            removed: diff.removals.len(),
            date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }

    /// Commit message, e.g. `Archive: +3 starred, -1 unstarred (2024-05-01)`
    pub fn commit_message(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if self.added > 0 {
            parts.push(format!("+{} starred", self.added));
        }
        if self.removed > 0 {
            parts.push(format!("-{} unstarred", self.removed));
        }
        format!(
            "Archive: {} ({})",
            parts.join(", "),
            self.date.format("%Y-%m-%d")
        )
    }
}
