//! Built-in defaults, the lowest layer of every merge.

use crate::backup::DEFAULT_MAX_SNAPSHOTS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder seeded with the storage defaults.
///
/// Sections not listed here fall back to their serde defaults.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("storage.agents_file", "agents.json")?
        .set_default("storage.backup_dir", "backups")?
        .set_default("storage.max_backups", DEFAULT_MAX_SNAPSHOTS as u64)
}
