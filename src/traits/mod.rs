//! Core trait abstractions.

pub mod provider;
pub mod store;

pub use provider::{ChatMessage, ChatModel, CompletionOptions, Role};
pub use store::{ConversationStore, EventStore, RecordStore};
