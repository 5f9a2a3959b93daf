//! agentbook: agent configuration records with automatic JSON backups
//!
//! Keeps an ordered list of agent configurations in a single JSON file.
//! Every save first copies the previous file into a timestamped snapshot;
//! snapshots can be listed, viewed, restored and pruned. A small client for
//! a hosted knowledge service answers one-shot chat questions.

pub mod agent;
pub mod backup;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod logging;
pub mod tooling;
