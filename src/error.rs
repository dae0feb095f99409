//! Typed errors for the chat pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Maximum length of a raw payload snippet carried in diagnostics.
pub const PAYLOAD_SNIPPET_LEN: usize = 256;

/// Errors reported by a model provider backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Backend unreachable (transport-level failure)
    #[error("provider unreachable: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Backend reported an error, possibly inside an HTTP 200 body
    #[error("provider reported error: {message}")]
    Upstream { message: String },

    /// Response body did not match the expected shape
    #[error("malformed provider payload: {detail} (payload: {snippet})")]
    MalformedPayload { detail: String, snippet: String },

    /// Response decoded but carried no message content
    #[error("provider response contained no content")]
    MissingContent,
}

impl ProviderError {
    /// Build a `MalformedPayload` with the raw body truncated to a bounded snippet.
    pub fn malformed(detail: impl Into<String>, raw: &str) -> Self {
        let snippet = if raw.len() > PAYLOAD_SNIPPET_LEN {
            let mut end = PAYLOAD_SNIPPET_LEN;
            while !raw.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &raw[..end])
        } else {
            raw.to_string()
        };
        Self::MalformedPayload {
            detail: detail.into(),
            snippet,
        }
    }
}

/// Errors that can occur during chat operations.
///
/// Filter-synthesis and retrieval failures never appear here: the engine
/// absorbs them and widens the context instead (see `pipeline::engine`).
#[derive(Debug, Error)]
pub enum ChatError {
    /// Provider call failed in a context where no fallback exists
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Answer synthesis failed; fatal to the request
    #[error("answer synthesis failed: {source}")]
    Synthesis {
        #[source]
        source: ProviderError,
    },

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Conversation does not exist
    #[error("conversation not found: {id}")]
    ConversationNotFound { id: uuid::Uuid },
}

/// Result type alias for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Result type alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_payload_snippet_is_bounded() {
        let raw = "x".repeat(4096);
        let err = ProviderError::malformed("missing choices", &raw);
        match err {
            ProviderError::MalformedPayload { snippet, .. } => {
                assert!(snippet.len() <= PAYLOAD_SNIPPET_LEN + 3);
                assert!(snippet.ends_with("..."));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_payload_short_body_kept_whole() {
        let err = ProviderError::malformed("missing content", "{\"choices\":[]}");
        match err {
            ProviderError::MalformedPayload { snippet, .. } => {
                assert_eq!(snippet, "{\"choices\":[]}");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
