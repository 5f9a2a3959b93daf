//! StorageConfig and resolve_paths for the agent file and backup directory.

use crate::backup::DEFAULT_MAX_SNAPSHOTS;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_agents_file() -> PathBuf {
    PathBuf::from("agents.json")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_max_backups() -> usize {
    DEFAULT_MAX_SNAPSHOTS
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Primary agent file (relative to workspace root)
    #[serde(default = "default_agents_file")]
    pub agents_file: PathBuf,

    /// Snapshot directory (relative to workspace root)
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Snapshots kept by the startup retention pass
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

/// Storage locations resolved against a workspace root.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStorage {
    pub agents_file: PathBuf,
    pub backup_dir: PathBuf,
}

impl StorageConfig {
    /// Resolve storage paths to actual filesystem locations.
    /// Absolute paths are used as-is.
    ///
    /// The backup directory must not be the directory holding the agent
    /// file, otherwise the agent file would be listed, and pruned, as a
    /// snapshot.
    pub fn resolve_paths(&self, workspace_root: &Path) -> Result<ResolvedStorage, ApiError> {
        let resolved = ResolvedStorage {
            agents_file: workspace_root.join(&self.agents_file),
            backup_dir: workspace_root.join(&self.backup_dir),
        };
        if resolved.agents_file.parent() == Some(resolved.backup_dir.as_path()) {
            return Err(ApiError::ConfigError(format!(
                "storage.backup_dir ({}) must not be the directory holding storage.agents_file",
                resolved.backup_dir.display()
            )));
        }
        Ok(resolved)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            agents_file: default_agents_file(),
            backup_dir: default_backup_dir(),
            max_backups: default_max_backups(),
        }
    }
}
