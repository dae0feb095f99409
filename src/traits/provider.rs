//! Provider trait for chat-completion backends.
//!
//! One capability (`chat_completion`) behind a uniform contract; concrete
//! backends differ in wire shape but never in the surface they expose.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;

/// Role of a prompt message sent to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message in a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling options for one completion call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.1,
        }
    }
}

impl CompletionOptions {
    /// Options for one call with the given token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Chat-completion capability of a model backend.
///
/// Implementations wrap specific LLM providers and handle the specifics of
/// the wire format. Each call is a single attempt; no automatic retry.
/// Stateless aside from endpoint/key configuration, so one instance may be
/// reused across calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Name of the model this provider calls.
    fn model_name(&self) -> &str;

    /// Run one chat completion, returning the reply text already unwrapped
    /// from any backend-specific envelope.
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> ProviderResult<String>;
}
