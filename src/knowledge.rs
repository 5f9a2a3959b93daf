//! Knowledge-service chat
//!
//! A single best-effort `POST` per user message to a knowledge-base chat
//! endpoint. Independent of the agent store; failures come back as text for
//! the transcript instead of errors.

pub mod client;
pub mod contract;
pub mod transcript;

pub use client::{build_request_body, extract_reply, HttpKnowledgeClient, KnowledgeConfig};
pub use contract::KnowledgeService;
pub use transcript::{ChatSession, ChatTranscript, Speaker};
