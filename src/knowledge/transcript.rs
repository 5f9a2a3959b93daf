//! Chat transcript and the send-one-message flow.

use crate::knowledge::contract::KnowledgeService;
use owo_colors::OwoColorize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Assistant => "AI",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatTranscript {
    entries: Vec<(Speaker, String)>,
}

impl ChatTranscript {
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.entries.push((speaker, text.into()));
    }

    pub fn entries(&self) -> &[(Speaker, String)] {
        &self.entries
    }

    /// `Speaker: text` lines separated by blank lines.
    pub fn render(&self, color: bool) -> String {
        self.entries
            .iter()
            .map(|(speaker, text)| render_entry(*speaker, text, color))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub fn render_entry(speaker: Speaker, text: &str, color: bool) -> String {
    if !color {
        return format!("{}: {}", speaker.label(), text);
    }
    match speaker {
        Speaker::User => format!("{}: {}", speaker.label().cyan().bold(), text),
        Speaker::Assistant => format!("{}: {}", speaker.label().green().bold(), text),
    }
}

/// A transcript bound to the service answering it.
pub struct ChatSession {
    service: Arc<dyn KnowledgeService>,
    transcript: ChatTranscript,
}

impl ChatSession {
    pub fn new(service: Arc<dyn KnowledgeService>) -> Self {
        Self {
            service,
            transcript: ChatTranscript::default(),
        }
    }

    /// Send one message and return the reply.
    ///
    /// Blank input is ignored and returns `None` without calling the service.
    pub async fn send(&mut self, text: &str) -> Option<String> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        self.transcript.push(Speaker::User, message);
        let reply = self.service.chat(message).await;
        self.transcript.push(Speaker::Assistant, reply.clone());
        Some(reply)
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }
}
