//! Snapshot directory management.
//!
//! Snapshots are plain files, independent of where the primary file lives.
//! Each one is a deep copy written at creation time and never modified
//! afterwards; it is either present or deleted.

use crate::agent::codec;
use crate::agent::domain::AgentRecord;
use crate::backup::snapshot::{SnapshotId, SnapshotKind, SNAPSHOT_SUFFIX};
use crate::error::ApiError;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
}

impl BackupManager {
    /// Manager over `dir`, creating the directory if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| ApiError::io(&dir, e))?;
            tracing::info!("Created backup directory {}", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &SnapshotId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    /// Serialize `records` with the primary-file codec into a new snapshot.
    pub fn snapshot(
        &self,
        records: &[AgentRecord],
        kind: SnapshotKind,
    ) -> Result<SnapshotId, ApiError> {
        self.snapshot_at(records, kind, now())
    }

    /// As `snapshot`, with an explicit creation time.
    ///
    /// Two snapshots of the same kind within the same second share a name;
    /// the later one overwrites the earlier.
    pub fn snapshot_at(
        &self,
        records: &[AgentRecord],
        kind: SnapshotKind,
        taken_at: NaiveDateTime,
    ) -> Result<SnapshotId, ApiError> {
        let id = SnapshotId::new(kind, taken_at);
        let path = self.path_for(&id);
        let text = codec::encode(records)?;
        std::fs::write(&path, text).map_err(|e| ApiError::io(&path, e))?;
        tracing::info!("Created {} snapshot {} ({} agents)", kind, id, records.len());
        Ok(id)
    }

    /// Copy an existing file byte-for-byte into a new snapshot.
    ///
    /// Returns `None` without touching the directory when `source` does not
    /// exist. Used for the automatic snapshot taken before a save, so the
    /// snapshot is exactly what is about to be overwritten even if that file
    /// would not decode.
    pub fn snapshot_file(
        &self,
        source: &Path,
        kind: SnapshotKind,
    ) -> Result<Option<SnapshotId>, ApiError> {
        self.snapshot_file_at(source, kind, now())
    }

    pub fn snapshot_file_at(
        &self,
        source: &Path,
        kind: SnapshotKind,
        taken_at: NaiveDateTime,
    ) -> Result<Option<SnapshotId>, ApiError> {
        if !source.exists() {
            return Ok(None);
        }
        let id = SnapshotId::new(kind, taken_at);
        let path = self.path_for(&id);
        std::fs::copy(source, &path).map_err(|e| ApiError::io(source, e))?;
        tracing::info!("Created {} snapshot {} from {}", kind, id, source.display());
        Ok(Some(id))
    }

    /// All `.json` files in the directory, newest first.
    pub fn list(&self) -> Result<Vec<SnapshotId>, ApiError> {
        let mut ids = self.list_chronological()?;
        ids.reverse();
        Ok(ids)
    }

    /// All `.json` files in the directory, oldest first.
    pub(crate) fn list_chronological(&self) -> Result<Vec<SnapshotId>, ApiError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir).map_err(|e| ApiError::io(&self.dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(
                        "Failed to read directory entry in {}: {}",
                        self.dir.display(),
                        e
                    );
                    continue;
                }
            };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 backup filename: {:?}", entry.path());
                continue;
            };
            if !name.ends_with(SNAPSHOT_SUFFIX) {
                continue;
            }
            match SnapshotId::parse(&name) {
                Ok(id) => ids.push(id),
                Err(e) => tracing::debug!("Skipping {}: {}", name, e),
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Parsed JSON content of a snapshot, for viewing.
    pub fn read(&self, id: &SnapshotId) -> Result<Value, ApiError> {
        let path = self.existing_path(id)?;
        let content = std::fs::read_to_string(&path).map_err(|e| ApiError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| ApiError::ParseError {
            path,
            message: format!("invalid JSON: {}", e),
        })
    }

    /// Decode a snapshot exactly as the primary file is decoded.
    ///
    /// The store is not touched; the caller decides to replace its content.
    pub fn restore(&self, id: &SnapshotId) -> Result<Vec<AgentRecord>, ApiError> {
        let path = self.existing_path(id)?;
        codec::load(&path)
    }

    pub fn delete(&self, id: &SnapshotId) -> Result<(), ApiError> {
        let path = self.existing_path(id)?;
        std::fs::remove_file(&path).map_err(|e| ApiError::io(&path, e))?;
        tracing::info!("Deleted snapshot {}", id);
        Ok(())
    }

    fn existing_path(&self, id: &SnapshotId) -> Result<PathBuf, ApiError> {
        let path = self.path_for(id);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ApiError::NotFound(path))
        }
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
