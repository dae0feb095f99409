//! Historical-Events Chat Library
//!
//! A grounded question-answering core for a corpus of historical events.
//! Each turn runs a two-stage pipeline: a cheap model call synthesizes a
//! retrieval filter, the filter selects context events, and a second call
//! synthesizes an answer grounded in that context. Answers carry inline
//! `[event:ID]` citation markers that the linker turns into clickable
//! segments at render time.
//!
//! # Design Philosophy
//!
//! **"Recall over precision"**
//!
//! - Retrieval widens, never narrows: a failed or empty filter means the
//!   whole corpus goes into the answer prompt
//! - Filter synthesis is best-effort; answer synthesis is the only fatal
//!   model call in a turn
//! - Stored message content is canonical; citations are recomputed from it
//!   on every render and never persisted
//!
//! # Usage
//!
//! ```rust,ignore
//! use chronicle_chat::{ChatEngine, ChatRequest, MemoryStore, ProviderRegistry};
//! use chronicle_chat::testing::MockModel;
//! use std::sync::Arc;
//!
//! let store = MemoryStore::new();
//! store.seed_events(load_corpus()?);
//! let registry = ProviderRegistry::new(Arc::new(MockModel::new()));
//! let engine = ChatEngine::new(store, registry);
//!
//! let outcome = engine
//!     .send(ChatRequest::new("user-1", "when did rome fall?"))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (ChatModel, EventStore, ConversationStore)
//! - [`types`] - Domain data types (EventRecord, Conversation, Message)
//! - [`providers`] - Concrete model backends and the provider registry
//! - [`pipeline`] - The per-turn chat pipeline and its prompts
//! - [`linker`] - Citation scanning, marker stripping, and segment rendering
//! - [`stores`] - Storage implementations (MemoryStore)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod linker;
pub mod pipeline;
pub mod providers;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ChatError, ProviderError, ProviderResult, Result};
pub use linker::{AnchorConfig, Citation, Segment};
pub use pipeline::{ChatEngine, ChatOutcome, ChatRequest};
pub use providers::{GatewayProvider, OpenAiProvider, ProviderRegistry};
pub use stores::MemoryStore;
pub use traits::{
    provider::{ChatMessage, ChatModel, CompletionOptions, Role},
    store::{ConversationStore, EventStore, RecordStore},
};
pub use types::{Conversation, ContextFilter, Era, EventRecord, Message, Sender};
