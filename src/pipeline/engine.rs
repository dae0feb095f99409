//! The chat engine - orchestrates one question through the two-stage
//! pipeline.
//!
//! Per request: resolve a provider, synthesize a filter (non-fatal),
//! retrieve context (non-fatal, widens to the full corpus), synthesize an
//! answer (fatal), and append both sides of the exchange to the store.
//! Concurrent requests for different conversations are independent;
//! same-conversation ordering is the caller's concern.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::pipeline::answer::synthesize_answer;
use crate::pipeline::filter::synthesize_filter;
use crate::pipeline::retrieve::{apply_filter, frequent_tags};
use crate::providers::ProviderRegistry;
use crate::traits::store::RecordStore;
use crate::types::{EventRecord, Message, Sender};

/// One incoming chat turn.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Existing conversation, or None to start a new one
    pub conversation_id: Option<Uuid>,

    /// Owning user
    pub user_id: String,

    /// The question (or a `/id` / `/debug` client command)
    pub message: String,

    /// Requested model name; unknown names resolve to the default
    pub model: Option<String>,
}

impl ChatRequest {
    /// New-conversation request with the default model.
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            conversation_id: None,
            user_id: user_id.into(),
            message: message.into(),
            model: None,
        }
    }

    /// Continue an existing conversation.
    pub fn in_conversation(mut self, id: Uuid) -> Self {
        self.conversation_id = Some(id);
        self
    }

    /// Request a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Result of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// The conversation the turn belongs to (created if none was supplied)
    pub conversation_id: Uuid,

    /// Full refreshed message list, oldest first
    pub messages: Vec<Message>,

    /// True for `/debug` output; such content bypasses the citation linker
    /// and renders preformatted
    pub debug_dump: bool,
}

/// The chat pipeline over a record store and a provider registry.
pub struct ChatEngine<S: RecordStore> {
    store: S,
    registry: ProviderRegistry,
}

impl<S: RecordStore> ChatEngine<S> {
    /// Create an engine. The registry is built once at startup and shared.
    pub fn new(store: S, registry: ProviderRegistry) -> Self {
        Self { store, registry }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the provider registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run one chat turn.
    pub async fn send(&self, request: ChatRequest) -> Result<ChatOutcome> {
        match request.message.trim() {
            "/id" => return self.show_conversation_id(&request).await,
            "/debug" => return self.dump_history(&request).await,
            _ => {}
        }

        let provider = self.registry.resolve(request.model.as_deref());
        let conversation_id = self.resolve_conversation(&request).await?;

        // The user message is stored before synthesis so a later failure
        // still leaves it in history.
        self.store
            .append_message(conversation_id, Sender::User, &request.message)
            .await?;

        let history = self.store.list_messages(conversation_id).await?;
        // The question is passed to the prompts separately; drop it from
        // the transcript so it is not embedded twice.
        let prior = &history[..history.len().saturating_sub(1)];

        let corpus = self.store.list_events().await;
        let vocabulary = match &corpus {
            Ok(events) => frequent_tags(events),
            Err(e) => {
                warn!(error = %e, "corpus read failed, synthesizing filter without vocabulary");
                Vec::new()
            }
        };

        let filter =
            synthesize_filter(provider.as_ref(), &vocabulary, prior, &request.message).await;

        let context = match corpus {
            Ok(events) => apply_filter(&filter, &events),
            Err(_) => self.full_corpus_fallback().await?,
        };

        let answer =
            synthesize_answer(provider.as_ref(), &context, prior, &request.message).await?;

        self.store
            .append_message(conversation_id, Sender::Bot, &answer)
            .await?;

        let messages = self.store.list_messages(conversation_id).await?;
        info!(
            conversation = %conversation_id,
            model = provider.model_name(),
            context_events = context.len(),
            "chat turn complete"
        );

        Ok(ChatOutcome {
            conversation_id,
            messages,
            debug_dump: false,
        })
    }

    /// `/id` short-circuit: report the conversation id without a model call.
    ///
    /// The exchange is not persisted; the reply rides along as a synthetic
    /// bot message.
    async fn show_conversation_id(&self, request: &ChatRequest) -> Result<ChatOutcome> {
        let conversation_id = self.resolve_conversation(request).await?;
        let mut messages = self.store.list_messages(conversation_id).await?;
        messages.push(Message::new(
            conversation_id,
            Sender::Bot,
            format!("Conversation ID: {conversation_id}"),
        ));
        Ok(ChatOutcome {
            conversation_id,
            messages,
            debug_dump: false,
        })
    }

    /// `/debug` short-circuit: return the raw stored history as a dump.
    async fn dump_history(&self, request: &ChatRequest) -> Result<ChatOutcome> {
        let conversation_id = self.resolve_conversation(request).await?;
        let messages = self.store.list_messages(conversation_id).await?;
        Ok(ChatOutcome {
            conversation_id,
            messages,
            debug_dump: true,
        })
    }

    /// Verify the supplied conversation or create one for the user.
    async fn resolve_conversation(&self, request: &ChatRequest) -> Result<Uuid> {
        match request.conversation_id {
            Some(id) => {
                self.store
                    .get_conversation(id)
                    .await?
                    .ok_or(ChatError::ConversationNotFound { id })?;
                Ok(id)
            }
            None => self.store.create_conversation(&request.user_id).await,
        }
    }

    /// Retrieval fallback: refetch the corpus unfiltered.
    async fn full_corpus_fallback(&self) -> Result<Vec<EventRecord>> {
        warn!("retrieval failed, falling back to unfiltered corpus");
        self.store.list_events().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::MockModel;
    use crate::traits::store::ConversationStore;
    use std::sync::Arc;

    fn engine_with(model: MockModel) -> ChatEngine<MemoryStore> {
        let store = MemoryStore::new();
        store.seed_events(vec![
            EventRecord::new("e1", "Fall of Rome", "The western empire collapses", 476)
                .with_tags(["Empire"]),
            EventRecord::new("e2", "Battle of Hastings", "Norman conquest", 1066)
                .with_tags(["battle"]),
        ]);
        ChatEngine::new(store, ProviderRegistry::new(Arc::new(model)))
    }

    #[tokio::test]
    async fn test_full_turn_appends_both_messages() {
        let model = MockModel::new()
            .with_reply(r#"{"text":["rome"],"tags":[]}"#)
            .with_reply("Rome fell in 476. [event:e1]");
        let engine = engine_with(model);

        let outcome = engine
            .send(ChatRequest::new("user-1", "when did rome fall?"))
            .await
            .unwrap();

        assert!(!outcome.debug_dump);
        assert_eq!(outcome.messages.len(), 2);
        assert_eq!(outcome.messages[0].sender, Sender::User);
        assert_eq!(outcome.messages[0].content, "when did rome fall?");
        assert_eq!(outcome.messages[1].sender, Sender::Bot);
        assert_eq!(outcome.messages[1].content, "Rome fell in 476. [event:e1]");
    }

    #[tokio::test]
    async fn test_unparseable_filter_uses_whole_corpus_in_answer_prompt() {
        let model = MockModel::new()
            .with_reply("not a filter")
            .with_reply("answer");
        let store = MemoryStore::new();
        store.seed_events(vec![
            EventRecord::new("e1", "Fall of Rome", "collapse", 476),
            EventRecord::new("e2", "Hastings", "conquest", 1066),
        ]);
        let registry = ProviderRegistry::new(Arc::new(model.clone()));
        let engine = ChatEngine::new(store, registry);

        engine
            .send(ChatRequest::new("user-1", "tell me things"))
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        let answer_prompt = &calls[1].messages.last().unwrap().content;
        assert!(answer_prompt.contains("id=\"e1\""));
        assert!(answer_prompt.contains("id=\"e2\""));
    }

    #[tokio::test]
    async fn test_synthesis_failure_preserves_user_message() {
        let model = MockModel::new()
            .with_reply(r#"{"text":[],"tags":[]}"#)
            .failing("over capacity");
        let engine = engine_with(model);

        let err = engine
            .send(ChatRequest::new("user-1", "doomed question"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Synthesis { .. }));

        // The user's message survived even though the turn failed.
        let conversations = engine.store().list_conversations("user-1").await.unwrap();
        assert_eq!(conversations.len(), 1);
        let history = engine
            .store()
            .list_messages(conversations[0].id)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "doomed question");
    }

    #[tokio::test]
    async fn test_id_command_skips_model_and_persistence() {
        let model = MockModel::new();
        let engine = engine_with(model.clone());

        let outcome = engine.send(ChatRequest::new("user-1", "/id")).await.unwrap();

        assert!(model.calls().is_empty());
        let last = outcome.messages.last().unwrap();
        assert!(last
            .content
            .contains(&outcome.conversation_id.to_string()));
        // Nothing was written to the store.
        let history = engine
            .store()
            .list_messages(outcome.conversation_id)
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_debug_command_returns_raw_history_flagged() {
        let model = MockModel::new()
            .with_reply(r#"{"text":[],"tags":[]}"#)
            .with_reply("an answer");
        let engine = engine_with(model);

        let first = engine
            .send(ChatRequest::new("user-1", "a question"))
            .await
            .unwrap();
        let dump = engine
            .send(ChatRequest::new("user-1", "/debug").in_conversation(first.conversation_id))
            .await
            .unwrap();

        assert!(dump.debug_dump);
        assert_eq!(dump.messages.len(), 2);
        assert_eq!(dump.messages[0].content, "a question");
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_an_error() {
        let engine = engine_with(MockModel::new());
        let err = engine
            .send(ChatRequest::new("user-1", "hi").in_conversation(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound { .. }));
    }

    #[tokio::test]
    async fn test_second_turn_sees_prior_history_in_prompt() {
        let model = MockModel::new()
            .with_reply(r#"{"text":[],"tags":[]}"#)
            .with_reply("first answer")
            .with_reply(r#"{"text":[],"tags":[]}"#)
            .with_reply("second answer");
        let store = MemoryStore::new();
        store.seed_events(vec![EventRecord::new("e1", "t", "d", 1)]);
        let engine = ChatEngine::new(store, ProviderRegistry::new(Arc::new(model.clone())));

        let first = engine
            .send(ChatRequest::new("user-1", "first question"))
            .await
            .unwrap();
        engine
            .send(
                ChatRequest::new("user-1", "second question")
                    .in_conversation(first.conversation_id),
            )
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 4);
        let second_answer_prompt = &calls[3].messages.last().unwrap().content;
        assert!(second_answer_prompt.contains("user: first question"));
        assert!(second_answer_prompt.contains("bot: first answer"));
        // The new question appears once, in its dedicated slot.
        assert_eq!(second_answer_prompt.matches("second question").count(), 1);
    }
}
