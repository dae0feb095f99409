//! Citation scanning and anchor derivation.
//!
//! A citation marker is the literal `[event:ID]` where ID is one or more
//! word/hyphen characters. For each marker the linker derives a short
//! natural-language anchor from the text preceding it; the anchor is what
//! later becomes the clickable span.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// The citation-marker grammar.
pub(crate) static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[event:([\w-]+)\]").expect("marker pattern is valid"));

/// Leading words dropped from anchor candidates.
const LEADING_ARTICLES: &[&str] = &["the", "a", "an", "in"];

/// Tuning knobs for anchor derivation.
///
/// The window sizes were tuned empirically against observed model output;
/// they are configuration, not semantics.
#[derive(Debug, Clone, Copy)]
pub struct AnchorConfig {
    /// Tokens taken before the marker when no preceding clause exists
    pub clause_window: usize,

    /// Maximum tokens kept in the final anchor (trailing tokens win)
    pub max_anchor_tokens: usize,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            clause_window: 8,
            max_anchor_tokens: 4,
        }
    }
}

/// A derived citation: anchor text plus the referenced event id.
///
/// Ephemeral - recomputed per render from message content, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub anchor: String,
    pub event_id: String,
}

/// Scan message content for citation markers and derive an anchor for each.
///
/// First occurrence wins: a second marker for the same event id produces no
/// second citation. Markers whose anchor derivation comes up empty are
/// dropped silently.
pub fn scan_citations(content: &str, config: &AnchorConfig) -> Vec<Citation> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut citations = Vec::new();
    let mut prev_end = 0;

    for captures in MARKER_RE.captures_iter(content) {
        let marker = captures.get(0).expect("whole match always present");
        let event_id = captures[1].to_string();
        // Anchors derive from the prose since the previous marker, so one
        // marker's text never bleeds into the next anchor.
        let preceding = &content[prev_end..marker.start()];
        prev_end = marker.end();

        if seen.contains(&event_id) {
            continue;
        }

        if let Some(anchor) = derive_anchor(preceding, config) {
            seen.insert(event_id.clone());
            citations.push(Citation { anchor, event_id });
        }
    }

    citations
}

/// Derive anchor text from everything preceding a marker.
///
/// Preference order: the clause between the previous sentence boundary and
/// the marker; failing that, a trailing token window. The result is then
/// cleaned (articles, edge punctuation), truncated at the first capital
/// letter when the text starts lowercase, and capped to the trailing
/// tokens closest to the marker.
pub fn derive_anchor(preceding: &str, config: &AnchorConfig) -> Option<String> {
    // Drop the whitespace and sentence punctuation sitting between the
    // prose and the marker itself.
    let base = preceding
        .trim_end()
        .trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '(' || c == ')'));

    let clause = base
        .rfind(['.', '!', '?', '\n'])
        .map(|idx| base[idx + 1..].trim())
        .filter(|clause| !clause.is_empty());

    let candidate = match clause {
        Some(clause) => clause.to_string(),
        None => {
            // No preceding clause: fall back to a trailing token window.
            let tokens: Vec<&str> = base.split_whitespace().collect();
            let start = tokens.len().saturating_sub(config.clause_window);
            tokens[start..].join(" ")
        }
    };

    let mut anchor = candidate.as_str();

    // Strip leading articles.
    loop {
        let Some(first) = anchor.split_whitespace().next() else {
            break;
        };
        if LEADING_ARTICLES
            .iter()
            .any(|article| first.eq_ignore_ascii_case(article))
        {
            anchor = anchor[first.len()..].trim_start();
        } else {
            break;
        }
    }

    // Strip anything that is not alphanumeric or a parenthesis from the edges.
    anchor = anchor.trim_matches(|c: char| !(c.is_alphanumeric() || c == '(' || c == ')'));

    // A capital letter mid-text likely starts a proper-noun phrase; discard
    // the lowercase run before it.
    let mut anchor = anchor.to_string();
    if let Some(idx) = anchor.find(|c: char| c.is_uppercase()) {
        if idx > 0 {
            anchor = anchor[idx..].to_string();
        }
    }

    // Cap to the trailing tokens, the portion closest to the marker.
    let tokens: Vec<&str> = anchor.split_whitespace().collect();
    if tokens.len() > config.max_anchor_tokens {
        anchor = tokens[tokens.len() - config.max_anchor_tokens..].join(" ");
    }

    if anchor.is_empty() {
        None
    } else {
        Some(anchor)
    }
}
