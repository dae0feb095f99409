//! Domain types for the chat pipeline.

pub mod event;
pub mod filter;
pub mod message;

pub use event::{Era, EventRecord};
pub use filter::ContextFilter;
pub use message::{Conversation, Message, Sender};
