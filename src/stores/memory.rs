//! In-memory storage backend.
//!
//! Backs tests and local development; nothing survives the process. The
//! event corpus keeps its seed order so unfiltered retrieval returns the
//! corpus exactly as loaded.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::traits::{ConversationStore, EventStore};
use crate::types::{Conversation, EventRecord, Message, Sender};

#[derive(Default)]
struct MemoryInner {
    events: Vec<EventRecord>,
    conversations: Vec<Conversation>,
    messages: HashMap<Uuid, Vec<Message>>,
}

/// Thread-safe in-memory implementation of the storage traits.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the event corpus, keeping the given order.
    pub fn seed_events(&self, events: Vec<EventRecord>) {
        self.write().events = events;
    }

    /// Drop everything.
    pub fn clear(&self) {
        *self.write() = MemoryInner::default();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryInner> {
        // Lock poisoning only happens after a panic mid-write; propagating
        // it here would just mask the original panic.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MemoryInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>> {
        Ok(self.read().events.clone())
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create_conversation(&self, user_id: &str) -> Result<Uuid> {
        let conversation = Conversation::new(user_id);
        let id = conversation.id;
        let mut inner = self.write();
        inner.conversations.push(conversation);
        inner.messages.insert(id, Vec::new());
        Ok(id)
    }

    async fn get_conversation(&self, id: Uuid) -> Result<Option<Conversation>> {
        Ok(self
            .read()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        // Reverse insertion order; stable even when timestamps collide.
        Ok(self
            .read()
            .conversations
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append_message(
        &self,
        conversation_id: Uuid,
        sender: Sender,
        content: &str,
    ) -> Result<Message> {
        let mut inner = self.write();
        let log = inner
            .messages
            .get_mut(&conversation_id)
            .ok_or_else(|| {
                ChatError::Storage(format!("unknown conversation: {conversation_id}").into())
            })?;
        let message = Message::new(conversation_id, sender, content);
        log.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        Ok(self
            .read()
            .messages
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}
