//! Filter synthesis - one model call turning a question into a structured
//! retrieval filter.

use tracing::{debug, warn};

use crate::pipeline::prompts::{format_filter_prompt, SYSTEM_PROMPT};
use crate::traits::provider::{ChatMessage, ChatModel, CompletionOptions};
use crate::types::{ContextFilter, Message};

/// Token budget for the filter call; the reply is a small JSON object.
const FILTER_MAX_TOKENS: u32 = 256;

/// Synthesize a retrieval filter for a question.
///
/// Never fails the request: any provider or parse failure yields an empty
/// filter, which the retriever treats as "use the whole corpus".
pub async fn synthesize_filter(
    model: &dyn ChatModel,
    tags: &[String],
    history: &[Message],
    question: &str,
) -> ContextFilter {
    let prompt = format_filter_prompt(tags, history, question);
    let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
    let options = CompletionOptions::default().with_max_tokens(FILTER_MAX_TOKENS);

    let response = match model.chat_completion(&messages, &options).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "filter synthesis call failed, using empty filter");
            return ContextFilter::default();
        }
    };

    match parse_filter_response(&response) {
        Some(filter) => {
            debug!(
                text_terms = filter.text.len(),
                tag_terms = filter.tags.len(),
                "synthesized filter"
            );
            filter
        }
        None => {
            warn!("filter response not parseable, using empty filter");
            ContextFilter::default()
        }
    }
}

/// Parse a model reply as a `ContextFilter`, unwrapping a markdown code
/// fence if the model added one. Any other shape is a parse failure.
pub fn parse_filter_response(response: &str) -> Option<ContextFilter> {
    serde_json::from_str(response)
        .or_else(|_| {
            let json_str = response
                .trim()
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim();
            serde_json::from_str(json_str)
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[test]
    fn test_parse_plain_json() {
        let filter = parse_filter_response(r#"{"text":["rome"],"tags":["Empire"]}"#).unwrap();
        assert_eq!(filter.text, vec!["rome"]);
        assert_eq!(filter.tags, vec!["Empire"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n{\"text\":[],\"tags\":[\"war\"]}\n```";
        let filter = parse_filter_response(response).unwrap();
        assert_eq!(filter.tags, vec!["war"]);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(parse_filter_response(r#"["rome","empire"]"#).is_none());
        assert!(parse_filter_response("I think you want Roman events.").is_none());
    }

    #[tokio::test]
    async fn test_garbage_reply_degrades_to_empty_filter() {
        let model = MockModel::new().with_reply("not json at all");
        let filter = synthesize_filter(&model, &[], &[], "when did rome fall?").await;
        assert!(filter.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_empty_filter() {
        let model = MockModel::new().failing("backend down");
        let filter = synthesize_filter(&model, &[], &[], "when did rome fall?").await;
        assert!(filter.is_empty());
    }

    #[tokio::test]
    async fn test_filter_call_uses_small_token_budget() {
        let model = MockModel::new().with_reply(r#"{"text":[],"tags":[]}"#);
        synthesize_filter(&model, &[], &[], "q").await;
        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].options.max_tokens, FILTER_MAX_TOKENS);
        assert!(calls[0].options.temperature <= 0.2);
    }
}
