//! Context filter produced by the filter-synthesis stage.

use serde::{Deserialize, Serialize};

/// Structured filter over the event corpus.
///
/// Produced per question and never persisted. Empty fields mean "no
/// constraint on this axis"; a fully empty filter retrieves the whole
/// corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFilter {
    /// Free-text terms, substring-matched against title and description
    #[serde(default)]
    pub text: Vec<String>,

    /// Tag terms, exact-matched against event tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ContextFilter {
    /// Create an unconstrained filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when neither axis constrains retrieval.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tags.is_empty()
    }

    /// Add text terms.
    pub fn with_text(mut self, terms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.text.extend(terms.into_iter().map(|t| t.into()));
        self
    }

    /// Add tag terms.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }
}
