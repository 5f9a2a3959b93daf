//! Agent records
//!
//! The record shape, form validation, the JSON codec, the in-memory store
//! and the command workflows that tie the store to the backup manager.

pub mod codec;
mod commands;
pub mod domain;
mod store;

pub use commands::{
    AgentCommandService, AgentListItem, AgentListResult, ImportResult, RestoreResult,
    SaveOutcome,
};
pub use domain::{validate, AgentField, AgentForm, AgentRecord};
pub use store::{AgentStore, ImportPolicy};
