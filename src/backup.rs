//! Backup lifecycle
//!
//! Timestamped snapshots of the serialized agent list, kept in a directory
//! of their own: creation (automatic before every save, or manual), listing,
//! viewing, restoring, deletion, and a retention cap.

pub mod manager;
pub mod retention;
pub mod snapshot;

pub use manager::BackupManager;
pub use retention::{prune_candidates, RetentionReport, DEFAULT_MAX_SNAPSHOTS};
pub use snapshot::{SnapshotId, SnapshotKind};
