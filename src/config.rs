//! Configuration
//!
//! `AppConfig` is assembled by the `config` crate from built-in defaults, an
//! optional global file, an optional workspace file and `AGENTBOOK_*`
//! environment variables, in increasing order of precedence.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::storage_paths::{ResolvedStorage, StorageConfig};

use crate::knowledge::KnowledgeConfig;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Name of the per-workspace configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = "agentbook.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
