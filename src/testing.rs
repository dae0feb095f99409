//! Test doubles for the provider layer.
//!
//! `MockModel` is a scripted `ChatModel`: replies and failures queue up in
//! the order the pipeline will consume them, and every call is recorded so
//! tests can assert on the exact prompts and options sent.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{ProviderError, ProviderResult};
use crate::traits::{ChatMessage, ChatModel, CompletionOptions};

/// One recorded `chat_completion` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

enum ScriptEntry {
    Reply(String),
    Failure(String),
}

#[derive(Default)]
struct MockState {
    script: VecDeque<ScriptEntry>,
    calls: Vec<RecordedCall>,
}

/// A scripted in-memory model backend.
///
/// Clones share script and call history, so a test can hand one clone to
/// the registry and keep another for assertions.
#[derive(Clone)]
pub struct MockModel {
    name: String,
    state: Arc<RwLock<MockState>>,
}

impl MockModel {
    /// A mock named "mock-model".
    pub fn new() -> Self {
        Self::named("mock-model")
    }

    /// A mock with an explicit model name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(RwLock::new(MockState::default())),
        }
    }

    /// Queue a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.state
            .write()
            .expect("mock state lock")
            .script
            .push_back(ScriptEntry::Reply(reply.into()));
        self
    }

    /// Queue an upstream failure.
    pub fn failing(self, message: impl Into<String>) -> Self {
        self.state
            .write()
            .expect("mock state lock")
            .script
            .push_back(ScriptEntry::Failure(message.into()));
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.read().expect("mock state lock").calls.clone()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> ProviderResult<String> {
        let mut state = self.state.write().expect("mock state lock");
        state.calls.push(RecordedCall {
            messages: messages.to_vec(),
            options: *options,
        });

        match state.script.pop_front() {
            Some(ScriptEntry::Reply(reply)) => Ok(reply),
            Some(ScriptEntry::Failure(message)) => {
                Err(ProviderError::Upstream { message })
            }
            // Unscripted call: answer with something inert rather than
            // failing, so tests only script the calls they care about.
            None => Ok(String::from("mock reply")),
        }
    }
}
