//! Answer synthesis - the grounded model call whose reply becomes the bot
//! message.

use tracing::debug;

use crate::error::{ChatError, Result};
use crate::pipeline::prompts::{format_answer_prompt, SYSTEM_PROMPT};
use crate::traits::provider::{ChatMessage, ChatModel, CompletionOptions};
use crate::types::{EventRecord, Message};

/// Token budget for the answer call.
const ANSWER_MAX_TOKENS: u32 = 2048;

/// Synthesize a grounded answer from the retrieved context.
///
/// Unlike the filter stage there is no fallback: a failure here is fatal
/// to the request and surfaces as `ChatError::Synthesis`.
pub async fn synthesize_answer(
    model: &dyn ChatModel,
    context: &[EventRecord],
    history: &[Message],
    question: &str,
) -> Result<String> {
    let prompt = format_answer_prompt(context, history, question);
    let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
    let options = CompletionOptions::default().with_max_tokens(ANSWER_MAX_TOKENS);

    debug!(
        context_events = context.len(),
        history_len = history.len(),
        "answer synthesis request"
    );

    model
        .chat_completion(&messages, &options)
        .await
        .map_err(|source| ChatError::Synthesis { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[tokio::test]
    async fn test_reply_is_returned_verbatim() {
        let model = MockModel::new().with_reply("Rome fell in 476. [event:e1]");
        let answer = synthesize_answer(&model, &[], &[], "when did rome fall?")
            .await
            .unwrap();
        assert_eq!(answer, "Rome fell in 476. [event:e1]");
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal() {
        let model = MockModel::new().failing("capacity");
        let err = synthesize_answer(&model, &[], &[], "q").await.unwrap_err();
        assert!(matches!(err, ChatError::Synthesis { .. }));
    }

    #[tokio::test]
    async fn test_prompt_contains_serialized_context() {
        let model = MockModel::new().with_reply("ok");
        let context = vec![EventRecord::new("e9", "Hastings", "Norman victory", 1066)];
        synthesize_answer(&model, &context, &[], "what happened?")
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        let user_prompt = &calls[0].messages.last().unwrap().content;
        assert!(user_prompt.contains("id=\"e9\""));
        assert!(user_prompt.contains("what happened?"));
        assert_eq!(calls[0].options.max_tokens, ANSWER_MAX_TOKENS);
    }
}
