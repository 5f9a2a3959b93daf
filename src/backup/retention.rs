//! Retention policy: cap the number of kept snapshots by deleting the oldest.

use crate::backup::manager::BackupManager;
use crate::backup::snapshot::SnapshotId;
use crate::error::ApiError;

/// Snapshot cap applied at startup unless configured otherwise.
pub const DEFAULT_MAX_SNAPSHOTS: usize = 30;

/// Outcome of one pruning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionReport {
    pub kept: usize,
    pub deleted: Vec<SnapshotId>,
    pub failed: Vec<(SnapshotId, String)>,
}

/// The oldest `len - max_count` of `chronological` (oldest first).
pub fn prune_candidates(chronological: &[SnapshotId], max_count: usize) -> &[SnapshotId] {
    let excess = chronological.len().saturating_sub(max_count);
    &chronological[..excess]
}

impl BackupManager {
    /// Delete the oldest snapshots so that at most `max_count` remain.
    ///
    /// Both kinds count against the same cap. Failures are logged and
    /// recorded in the report; a failed deletion does not stop the rest.
    pub fn enforce_retention(&self, max_count: usize) -> RetentionReport {
        let chronological = match self.list_chronological() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Failed to list backups for cleanup: {}", e);
                return RetentionReport::default();
            }
        };

        prune_with(&chronological, max_count, |id| self.delete(id))
    }
}

/// Delete the oldest excess of `chronological` through `delete`.
///
/// Every candidate is attempted; a failure is logged and recorded and the
/// remaining candidates are still deleted.
pub(crate) fn prune_with(
    chronological: &[SnapshotId],
    max_count: usize,
    mut delete: impl FnMut(&SnapshotId) -> Result<(), ApiError>,
) -> RetentionReport {
    let mut report = RetentionReport::default();
    for id in prune_candidates(chronological, max_count) {
        match delete(id) {
            Ok(()) => {
                tracing::info!("Pruned old backup {}", id);
                report.deleted.push(id.clone());
            }
            Err(e) => {
                tracing::warn!("Failed to prune backup {}: {}", id, e);
                report.failed.push((id.clone(), e.to_string()));
            }
        }
    }
    report.kept = chronological.len() - report.deleted.len();
    report
}
