//! Tooling & Integration Layer
//!
//! The command-line front end. It drives the agent store, the backup
//! manager and the knowledge client through the same calls any other
//! front end would make.

pub mod cli;

pub use cli::{AgentCommands, AgentFieldArgs, BackupCommands, Cli, CliContext, Commands};
