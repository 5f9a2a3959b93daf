//! Agent command service: one entry point per user-facing workflow.
//!
//! Owns the workflow logic that spans the store, the codec and the backup
//! manager; the CLI parses, calls one method and formats the result.

use crate::agent::codec;
use crate::agent::domain::{validate, AgentForm, AgentRecord};
use crate::agent::store::{AgentStore, ImportPolicy};
use crate::backup::{BackupManager, SnapshotId, SnapshotKind};
use crate::error::ApiError;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct AgentCommandService;

/// Result of a full save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub count: usize,
    /// Snapshot of the previous file content; `None` when there was no file.
    pub auto_backup: Option<SnapshotId>,
}

/// Result of agent list.
#[derive(Debug, Clone, Serialize)]
pub struct AgentListResult {
    pub agents: Vec<AgentListItem>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentListItem {
    /// 1-based position as shown to the user.
    pub position: usize,
    pub id: String,
    pub name: String,
    pub model: String,
    pub selected: bool,
}

/// Result of import.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub total: usize,
    pub policy: ImportPolicy,
}

/// Result of restoring a snapshot into the store.
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub snapshot: SnapshotId,
    pub count: usize,
}

impl AgentCommandService {
    /// Load the primary file into a store. An absent file is an empty store.
    pub fn load(path: &Path) -> Result<AgentStore, ApiError> {
        match codec::load(path) {
            Ok(records) => {
                tracing::info!("Loaded {} agents from {}", records.len(), path.display());
                Ok(AgentStore::from_records(records))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("{} not found, starting with no agents", path.display());
                Ok(AgentStore::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Write the whole store to `path`.
    ///
    /// When `path` already exists it is first copied into an automatic
    /// snapshot; if that copy fails the file is left untouched.
    pub fn save(
        store: &AgentStore,
        path: &Path,
        backups: &BackupManager,
    ) -> Result<SaveOutcome, ApiError> {
        let auto_backup = backups.snapshot_file(path, SnapshotKind::Auto)?;
        codec::save(path, store.records())?;
        tracing::info!(
            "Saved {} agents to {}",
            store.len(),
            path.display()
        );
        Ok(SaveOutcome {
            path: path.to_path_buf(),
            count: store.len(),
            auto_backup,
        })
    }

    pub fn list(store: &AgentStore) -> AgentListResult {
        let agents = store
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| AgentListItem {
                position: index + 1,
                id: record.id.clone(),
                name: record.display_name().to_string(),
                model: record.model.clone(),
                selected: store.selected() == Some(index),
            })
            .collect();
        AgentListResult {
            agents,
            total: store.len(),
        }
    }

    /// Validate `form` and write it over the record at `index`.
    ///
    /// Keys the form does not model are carried over from the replaced
    /// record. On a validation error the store is unchanged.
    pub fn apply_form(
        store: &mut AgentStore,
        index: usize,
        form: &AgentForm,
    ) -> Result<AgentRecord, ApiError> {
        let previous = store.get_or_error(index)?;
        let mut record = validate(form)?;
        record.extra = previous.extra.clone();
        store.update(index, record.clone())?;
        Ok(record)
    }

    /// Write the store to an arbitrary path with the primary-file codec.
    pub fn export(store: &AgentStore, path: &Path) -> Result<usize, ApiError> {
        codec::save(path, store.records())?;
        tracing::info!("Exported {} agents to {}", store.len(), path.display());
        Ok(store.len())
    }

    /// Read an arbitrary file of agents without touching the store.
    pub fn read_import(path: &Path) -> Result<Vec<AgentRecord>, ApiError> {
        codec::load(path)
    }

    /// Combine already-read records into the store under `policy`.
    pub fn import(
        store: &mut AgentStore,
        records: Vec<AgentRecord>,
        policy: ImportPolicy,
    ) -> ImportResult {
        let imported = records.len();
        store.import(records, policy);
        tracing::info!("Imported {} agents ({:?})", imported, policy);
        ImportResult {
            imported,
            total: store.len(),
            policy,
        }
    }

    /// Manual snapshot of the in-memory list. An empty list is refused.
    pub fn create_backup(
        store: &AgentStore,
        backups: &BackupManager,
    ) -> Result<SnapshotId, ApiError> {
        if store.is_empty() {
            return Err(ApiError::NothingToBackUp);
        }
        backups.snapshot(store.records(), SnapshotKind::Manual)
    }

    /// Replace the store with a snapshot's content. Never merges.
    pub fn restore(
        store: &mut AgentStore,
        backups: &BackupManager,
        snapshot: &SnapshotId,
    ) -> Result<RestoreResult, ApiError> {
        let records = backups.restore(snapshot)?;
        let count = records.len();
        store.replace_all(records);
        Ok(RestoreResult {
            snapshot: snapshot.clone(),
            count,
        })
    }
}
