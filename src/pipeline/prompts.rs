//! LLM prompts for the two pipeline stages.

use crate::types::{EventRecord, Message};

/// System message sent with both stages.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant for an app that displays information about historical events.";

/// Prompt for synthesizing a retrieval filter from a question.
pub const FILTER_PROMPT: &str = r#"You select which historical events are relevant to a user's question.

Known tags (only use tags from this list):
{tags}

Conversation so far:
{history}

New question: {question}

Output a JSON object selecting events by free-text terms and tags:
{
    "text": ["terms matched against event titles and descriptions"],
    "tags": ["tags from the known list"]
}

Return ONLY the JSON object. Use empty arrays when no constraint applies."#;

/// Prompt for synthesizing a grounded answer with citation markers.
pub const ANSWER_PROMPT: &str = r#"Answer the user's question using ONLY the events below.

Events:
{events}

Conversation so far:
{history}

New question: {question}

Rules:
1. Ground every claim in the events provided; do not invent facts.
2. When a sentence uses an event, append its citation marker immediately
   after the sentence, formatted exactly as [event:ID].
3. If the events do not cover the question, say so plainly.
4. Answer in concise prose, no markdown headings."#;

/// Serialize one event as a compact quoted-field line.
pub fn event_line(event: &EventRecord) -> String {
    format!(
        "id=\"{}\" title=\"{}\" year=\"{}\" description=\"{}\"",
        event.id, event.title, event.year, event.description
    )
}

/// Serialize the conversation history as a role-prefixed transcript.
pub fn transcript(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}", m.sender.transcript_label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the filter-synthesis prompt.
pub fn format_filter_prompt(tags: &[String], history: &[Message], question: &str) -> String {
    FILTER_PROMPT
        .replace("{tags}", &tags.join(", "))
        .replace("{history}", &transcript(history))
        .replace("{question}", question)
}

/// Format the answer-synthesis prompt.
pub fn format_answer_prompt(events: &[EventRecord], history: &[Message], question: &str) -> String {
    let events_text = events.iter().map(event_line).collect::<Vec<_>>().join("\n");
    ANSWER_PROMPT
        .replace("{events}", &events_text)
        .replace("{history}", &transcript(history))
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, Sender};
    use uuid::Uuid;

    #[test]
    fn test_event_line_quotes_fields() {
        let event = EventRecord::new("abc", "Fall of Rome", "The western empire ends", 476);
        assert_eq!(
            event_line(&event),
            "id=\"abc\" title=\"Fall of Rome\" year=\"476\" description=\"The western empire ends\""
        );
    }

    #[test]
    fn test_transcript_is_role_prefixed_in_order() {
        let conv = Uuid::new_v4();
        let history = vec![
            Message::new(conv, Sender::User, "who won?"),
            Message::new(conv, Sender::Bot, "The Normans."),
        ];
        assert_eq!(transcript(&history), "user: who won?\nbot: The Normans.");
    }

    #[test]
    fn test_format_filter_prompt_embeds_vocabulary() {
        let tags = vec!["Empire".to_string(), "war".to_string()];
        let formatted = format_filter_prompt(&tags, &[], "when did rome fall?");
        assert!(formatted.contains("Empire, war"));
        assert!(formatted.contains("when did rome fall?"));
    }

    #[test]
    fn test_format_answer_prompt_embeds_events() {
        let events = vec![EventRecord::new("e1", "Hastings", "Norman victory", 1066)];
        let formatted = format_answer_prompt(&events, &[], "what happened in 1066?");
        assert!(formatted.contains("id=\"e1\""));
        assert!(formatted.contains("[event:ID]"));
    }
}
