//! JSON snapshot store
//!
//! Persists the snapshot as a pretty-printed JSON array (two-space indent,
//! trailing newline) sorted newest star first, so that consecutive runs
//! produce minimal line diffs under version control.
//!
//! Writes go to `<path>.tmp` and are renamed over the target. A crash
//! mid-write leaves either the old archive or the new one, never a
//! truncated file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use starsync_core::domain::{Snapshot, StarredItem};
use starsync_core::ports::ISnapshotStore;

use crate::ArchiveError;

/// Snapshot store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the archive; a missing file is an empty snapshot
    pub async fn read(&self) -> Result<Snapshot, ArchiveError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Archive not found");
                return Ok(Snapshot::empty());
            }
            Err(source) => {
                return Err(ArchiveError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let items: Vec<StarredItem> =
            serde_json::from_str(&content).map_err(|source| ArchiveError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Snapshot::from_items(items))
    }

    /// Replaces the archive with `snapshot`
    #[instrument(skip(self, snapshot), fields(path = %self.path.display(), items = snapshot.len()))]
    pub async fn write(&self, snapshot: &Snapshot) -> Result<(), ArchiveError> {
        let data = render(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(parent, source))?;
        }

        let tmp_path = {
            let mut p = self.path.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };

        debug!(?tmp_path, "writing to temporary file");
        tokio::fs::write(&tmp_path, data.as_bytes())
            .await
            .map_err(|source| self.io_error(&tmp_path, source))?;

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| self.io_error(&self.path, source))?;

        info!(bytes = data.len(), "Archive written");
        Ok(())
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> ArchiveError {
        ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Canonical on-disk form of a snapshot
///
/// Items are ordered newest star first; ties fall back to the repository
/// URL so the output is fully determined by the snapshot's contents.
pub fn render(snapshot: &Snapshot) -> Result<String, ArchiveError> {
    let sorted = snapshot.clone().sorted_by_recency();
    let mut out = serde_json::to_string_pretty(sorted.items()).map_err(ArchiveError::Serialize)?;
    out.push('\n');
    Ok(out)
}

#[async_trait]
impl ISnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> anyhow::Result<Snapshot> {
        Ok(self.read().await?)
    }

    async fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        Ok(self.write(snapshot).await?)
    }
}
