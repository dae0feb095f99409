//! The chat pipeline - filter synthesis, retrieval, and answer synthesis.
//!
//! Control flow per turn: question → filter synthesis → retrieval →
//! answer synthesis → raw answer text with citation markers. The linker
//! (see [`crate::linker`]) runs client-side over the stored text.

pub mod answer;
pub mod engine;
pub mod filter;
pub mod prompts;
pub mod retrieve;

pub use answer::synthesize_answer;
pub use engine::{ChatEngine, ChatOutcome, ChatRequest};
pub use filter::{parse_filter_response, synthesize_filter};
pub use prompts::{
    format_answer_prompt, format_filter_prompt, transcript, ANSWER_PROMPT, FILTER_PROMPT,
    SYSTEM_PROMPT,
};
pub use retrieve::{apply_filter, frequent_tags};
