//! Snapshot identity: the filename encodes the kind and a second-resolution
//! creation timestamp, `<kind>_<YYYYMMDD_HHMMSS>.json`.

use crate::error::ApiError;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

pub const SNAPSHOT_SUFFIX: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TIMESTAMP_LEN: usize = 15;

/// Why a snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    /// Taken implicitly right before the primary file is overwritten.
    Auto,
    /// Taken on explicit request.
    Manual,
}

impl SnapshotKind {
    pub fn prefix(self) -> &'static str {
        match self {
            SnapshotKind::Auto => "agents_auto_backup",
            SnapshotKind::Manual => "agents_backup",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "agents_auto_backup" => Some(SnapshotKind::Auto),
            "agents_backup" => Some(SnapshotKind::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::Auto => f.write_str("auto"),
            SnapshotKind::Manual => f.write_str("manual"),
        }
    }
}

/// Snapshot identifier: the bare filename inside the backup directory.
///
/// Ordering is chronological: by the encoded timestamp, then by name.
/// Names without a readable timestamp sort before all others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn new(kind: SnapshotKind, taken_at: NaiveDateTime) -> Self {
        Self(format!(
            "{}_{}{}",
            kind.prefix(),
            taken_at.format(TIMESTAMP_FORMAT),
            SNAPSHOT_SUFFIX
        ))
    }

    /// Accept a user-supplied id. It must be a plain `.json` filename; a path
    /// separator is rejected so the id cannot leave the backup directory.
    /// Dots inside the name (`a..b.json`) are an ordinary filename.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let invalid = || ApiError::InvalidSnapshotId(raw.to_string());
        if raw.len() <= SNAPSHOT_SUFFIX.len() || !raw.ends_with(SNAPSHOT_SUFFIX) {
            return Err(invalid());
        }
        if raw.contains('/') || raw.contains('\\') || raw.contains('\0') {
            return Err(invalid());
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creation time encoded in the name.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let (_, stamp) = self.split()?;
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
    }

    pub fn kind(&self) -> Option<SnapshotKind> {
        let (prefix, _) = self.split()?;
        SnapshotKind::from_prefix(prefix)
    }

    fn split(&self) -> Option<(&str, &str)> {
        let stem = self.0.strip_suffix(SNAPSHOT_SUFFIX)?;
        let cut = stem.len().checked_sub(TIMESTAMP_LEN + 1)?;
        let prefix = stem.get(..cut)?;
        let rest = stem.get(cut..)?;
        let stamp = rest.strip_prefix('_')?;
        Some((prefix, stamp))
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for SnapshotId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp()
            .cmp(&other.timestamp())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SnapshotId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
