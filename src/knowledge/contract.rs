//! Knowledge service port.

use async_trait::async_trait;

/// Anything that can answer one user message.
///
/// Implementations never fail: transport and format problems are returned
/// as a human-readable reply so the caller can show them in the transcript.
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    async fn chat(&self, query: &str) -> String;
}
