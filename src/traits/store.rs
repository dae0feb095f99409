//! Storage traits for the event corpus and conversation history.
//!
//! The storage layer is split into focused traits:
//! - `EventStore`: read-only access to the event corpus
//! - `ConversationStore`: append-only conversation/message history
//! - `RecordStore`: composite trait combining both

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Conversation, EventRecord, Message, Sender};

/// Read-only access to the event corpus.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// List every event record.
    async fn list_events(&self) -> Result<Vec<EventRecord>>;
}

/// Append-only conversation and message storage.
///
/// Delivered messages are never mutated in place; ordering of
/// `list_messages` is creation-time ascending.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation for a user, returning its id.
    async fn create_conversation(&self, user_id: &str) -> Result<Uuid>;

    /// Fetch a conversation by id.
    async fn get_conversation(&self, id: Uuid) -> Result<Option<Conversation>>;

    /// List a user's conversations, newest first.
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>>;

    /// Append a message to a conversation.
    async fn append_message(
        &self,
        conversation_id: Uuid,
        sender: Sender,
        content: &str,
    ) -> Result<Message>;

    /// List a conversation's messages, oldest first.
    async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>>;
}

/// Composite storage trait used by the chat engine.
pub trait RecordStore: EventStore + ConversationStore {}

// Blanket implementation: anything implementing both traits is a RecordStore
impl<T: EventStore + ConversationStore> RecordStore for T {}
