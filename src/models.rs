//! Core data types used throughout the pipeline.
//!
//! These types represent the chunks, retrieval hits, and conversation
//! messages that flow through ingestion, retrieval, and generation.

use serde::{Deserialize, Serialize};

/// A retrieval hit: chunk text plus its similarity score.
///
/// Produced by the vector store in descending-score order; lives only for
/// the duration of one query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

/// Conversation role.
///
/// Serialized with the wire names the chat API expects
/// (`system` / `user` / `assistant`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    Human,
    #[serde(rename = "assistant")]
    Ai,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

/// Append-only message history for one session.
///
/// Created per session by the caller and passed by reference into
/// retrieval/generation — there is no process-global conversation state.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation seeded with a system prompt.
    pub fn with_system(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Content of the most recent human turn, if any.
    pub fn last_human(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Human)
            .map(|m| m.content.as_str())
    }

    /// Clone the history with the last human turn's content swapped for the
    /// assembled prompt. The stored history keeps the raw question; only the
    /// generation request carries the context-stuffed version.
    pub fn messages_for_generation(&self, assembled_prompt: &str) -> Vec<Message> {
        let mut messages = self.messages.clone();
        if let Some(last_human) = messages.iter_mut().rev().find(|m| m.role == Role::Human) {
            last_human.content = assembled_prompt.to_string();
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_human_skips_ai_turns() {
        let mut convo = Conversation::with_system("assistant");
        convo.push(Message::human("প্রথম প্রশ্ন"));
        convo.push(Message::ai("উত্তর"));
        assert_eq!(convo.last_human(), Some("প্রথম প্রশ্ন"));
    }

    #[test]
    fn last_human_empty_conversation() {
        let convo = Conversation::new();
        assert_eq!(convo.last_human(), None);
    }

    #[test]
    fn generation_messages_replace_only_last_human() {
        let mut convo = Conversation::with_system("assistant");
        convo.push(Message::human("আগের প্রশ্ন"));
        convo.push(Message::ai("আগের উত্তর"));
        convo.push(Message::human("নতুন প্রশ্ন"));

        let messages = convo.messages_for_generation("prompt with context");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "আগের প্রশ্ন");
        assert_eq!(messages[3].content, "prompt with context");
        // Stored history is untouched.
        assert_eq!(convo.messages()[3].content, "নতুন প্রশ্ন");
    }

    #[test]
    fn role_wire_names() {
        let msg = Message::ai("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"assistant\""));
        let msg = Message::human("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"user\""));
    }
}
