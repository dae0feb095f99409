//! Conversation and message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Transcript prefix for prompt reconstruction.
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A conversation owned by one user.
///
/// Never mutated except by message append; never explicitly destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// One message in a conversation.
///
/// Immutable once created; ordering is creation-time ascending and must be
/// preserved exactly for prompt reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub conversation_id: Uuid,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message.
    pub fn new(conversation_id: Uuid, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            sender,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_transcript_labels() {
        assert_eq!(Sender::User.transcript_label(), "user");
        assert_eq!(Sender::Bot.transcript_label(), "bot");
    }
}
