//! In-memory port implementations shared by the use case tests

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::domain::{
    ArchiveChange, BookmarkDraft, BookmarkId, BookmarkRecord, RepoUrl, Snapshot, StarredItem,
};
use crate::ports::{IArchivePublisher, IBookmarkService, ISnapshotStore, IStarSource};

/// Ordered log of port calls, shared between fakes to assert sequencing
pub(crate) type EventLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn star(name: &str, minutes: i64) -> StarredItem {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    StarredItem::new(
        name,
        RepoUrl::new(format!("https://github.com/{name}")).unwrap(),
        base + Duration::minutes(minutes),
    )
}

pub(crate) fn stars(count: usize) -> Vec<StarredItem> {
    (0..count)
        .map(|i| star(&format!("owner/repo-{i:04}"), i as i64))
        .collect()
}

// ----------------------------------------------------------------------------
// Star source
// ----------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct FakeStarSource {
    snapshot: Mutex<Snapshot>,
    fail: bool,
    log: EventLog,
}

impl FakeStarSource {
    pub(crate) fn returning(items: Vec<StarredItem>, log: &EventLog) -> Self {
        Self {
            snapshot: Mutex::new(Snapshot::from_items(items)),
            fail: false,
            log: log.clone(),
        }
    }

    pub(crate) fn failing(log: &EventLog) -> Self {
        Self {
            fail: true,
            log: log.clone(),
            ..Self::default()
        }
    }

    pub(crate) fn set(&self, items: Vec<StarredItem>) {
        *self.snapshot.lock().unwrap() = Snapshot::from_items(items);
    }
}

#[async_trait]
impl IStarSource for FakeStarSource {
    async fn fetch_all(&self) -> anyhow::Result<Snapshot> {
        self.log.lock().unwrap().push("fetch".to_string());
        if self.fail {
            anyhow::bail!("GitHub API returned 401 Unauthorized");
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }
}

// ----------------------------------------------------------------------------
// Snapshot store
// ----------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct MemoryStore {
    stored: Mutex<Option<Vec<StarredItem>>>,
    pub(crate) fail_load: bool,
    pub(crate) fail_save: bool,
    log: EventLog,
}

impl MemoryStore {
    pub(crate) fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            ..Self::default()
        }
    }

    pub(crate) fn with_items(items: Vec<StarredItem>, log: &EventLog) -> Self {
        Self {
            stored: Mutex::new(Some(items)),
            log: log.clone(),
            ..Self::default()
        }
    }

    /// What a human would see in the archive, in written order
    pub(crate) fn stored(&self) -> Option<Vec<StarredItem>> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl ISnapshotStore for MemoryStore {
    async fn load(&self) -> anyhow::Result<Snapshot> {
        self.log.lock().unwrap().push("load".to_string());
        if self.fail_load {
            anyhow::bail!("archive is not valid JSON");
        }
        Ok(self
            .stored
            .lock()
            .unwrap()
            .clone()
            .map(Snapshot::from_items)
            .unwrap_or_default())
    }

    async fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        self.log.lock().unwrap().push("save".to_string());
        if self.fail_save {
            anyhow::bail!("disk full");
        }
        let sorted = snapshot.clone().sorted_by_recency();
        *self.stored.lock().unwrap() = Some(sorted.into_items());
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Bookmark service
// ----------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct FakeBookmarkService {
    records: Mutex<Vec<BookmarkRecord>>,
    next_id: Mutex<u64>,
    exists_calls: Mutex<usize>,
    fail_exists_on: Mutex<HashSet<usize>>,
    fail_search_for: Mutex<HashSet<String>>,
    create_batches: Mutex<Vec<usize>>,
    log: EventLog,
}

impl FakeBookmarkService {
    pub(crate) fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            ..Self::default()
        }
    }

    /// Seeds a bookmark as if it had been created by hand
    pub(crate) fn seed(&self, link: &str) {
        let id = self.allocate_id();
        self.records.lock().unwrap().push(BookmarkRecord {
            id,
            link: link.to_string(),
            title: None,
        });
    }

    /// Makes the `n`-th (1-based) existence check fail
    pub(crate) fn fail_exists_call(&self, n: usize) {
        self.fail_exists_on.lock().unwrap().insert(n);
    }

    pub(crate) fn fail_search(&self, link: &str) {
        self.fail_search_for.lock().unwrap().insert(link.to_string());
    }

    pub(crate) fn links(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.link.clone())
            .collect()
    }

    pub(crate) fn exists_calls(&self) -> usize {
        *self.exists_calls.lock().unwrap()
    }

    pub(crate) fn create_batches(&self) -> Vec<usize> {
        self.create_batches.lock().unwrap().clone()
    }

    fn allocate_id(&self) -> BookmarkId {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        BookmarkId::new(*next)
    }
}

#[async_trait]
impl IBookmarkService for FakeBookmarkService {
    async fn existing_links(&self, links: &[RepoUrl]) -> anyhow::Result<HashSet<String>> {
        let call = {
            let mut calls = self.exists_calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        self.log.lock().unwrap().push(format!("exists:{}", links.len()));
        if self.fail_exists_on.lock().unwrap().contains(&call) {
            anyhow::bail!("bookmark service returned 502 Bad Gateway");
        }

        let records = self.records.lock().unwrap();
        Ok(links
            .iter()
            .filter(|l| records.iter().any(|r| r.link == l.as_str()))
            .map(|l| l.as_str().to_string())
            .collect())
    }

    async fn create_bookmarks(&self, drafts: &[BookmarkDraft]) -> anyhow::Result<usize> {
        self.log.lock().unwrap().push(format!("create:{}", drafts.len()));
        self.create_batches.lock().unwrap().push(drafts.len());
        for draft in drafts {
            let id = self.allocate_id();
            self.records.lock().unwrap().push(BookmarkRecord {
                id,
                link: draft.link.as_str().to_string(),
                title: Some(draft.title.clone()),
            });
        }
        Ok(drafts.len())
    }

    async fn search_by_link(&self, link: &RepoUrl) -> anyhow::Result<Vec<BookmarkRecord>> {
        self.log.lock().unwrap().push(format!("search:{link}"));
        if self.fail_search_for.lock().unwrap().contains(link.as_str()) {
            anyhow::bail!("connection reset by peer");
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.link.contains(link.as_str()))
            .cloned()
            .collect())
    }

    async fn delete_bookmark(&self, id: BookmarkId) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(format!("delete:{id}"));
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            anyhow::bail!("bookmark {id} not found");
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Publisher
// ----------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct RecordingPublisher {
    changes: Mutex<Vec<ArchiveChange>>,
    pub(crate) fail: bool,
    log: EventLog,
}

impl RecordingPublisher {
    pub(crate) fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            ..Self::default()
        }
    }

    pub(crate) fn changes(&self) -> Vec<ArchiveChange> {
        self.changes.lock().unwrap().clone()
    }
}

#[async_trait]
impl IArchivePublisher for RecordingPublisher {
    async fn publish(&self, change: &ArchiveChange) -> anyhow::Result<()> {
        self.log.lock().unwrap().push("publish".to_string());
        if self.fail {
            anyhow::bail!("git push rejected");
        }
        self.changes.lock().unwrap().push(*change);
        Ok(())
    }
}
