//! Marker stripping and segment rendering.
//!
//! Pure over `(content, events)`: no scan state survives a call. The fold
//! walks the stripped text left to right, turning each located anchor into
//! a link segment and everything between into formatted text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::linker::anchor::{scan_citations, AnchorConfig, Citation};
use crate::types::EventRecord;

/// A marker plus any whitespace immediately before it.
static MARKER_WITH_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[event:[\w-]+\]").expect("strip pattern is valid"));

/// One piece of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Formatted prose
    Text(String),

    /// Clickable link to an event record
    Link { text: String, event_id: String },
}

impl Segment {
    /// Text segment helper.
    pub fn text(content: impl Into<String>) -> Self {
        Segment::Text(content.into())
    }

    /// Link segment helper.
    pub fn link(text: impl Into<String>, event_id: impl Into<String>) -> Self {
        Segment::Link {
            text: text.into(),
            event_id: event_id.into(),
        }
    }

    /// True for link segments.
    pub fn is_link(&self) -> bool {
        matches!(self, Segment::Link { .. })
    }
}

/// Remove every citation marker (and any immediately preceding whitespace).
///
/// Total and idempotent: stripped text contains no `[event:...]` substring,
/// and stripping again is a no-op.
pub fn strip_markers(content: &str) -> String {
    MARKER_WITH_SPACE_RE.replace_all(content, "").into_owned()
}

/// Render one bot message into text and link segments.
///
/// Markers are scanned, stripped from the display text, and each derived
/// anchor is located case-insensitively in what remains. Anchors that
/// cannot be located are skipped; markers referencing unknown events render
/// as plain text. Content without markers comes back as a single text
/// segment. Raw debug dumps must bypass this function entirely.
pub fn render_message(content: &str, events: &[EventRecord]) -> Vec<Segment> {
    render_message_with(content, events, &AnchorConfig::default())
}

/// `render_message` with explicit anchor tuning.
pub fn render_message_with(
    content: &str,
    events: &[EventRecord],
    config: &AnchorConfig,
) -> Vec<Segment> {
    let citations = scan_citations(content, config);
    let stripped = strip_markers(content);

    if citations.is_empty() {
        return vec![Segment::text(stripped)];
    }

    let mut segments = Vec::new();
    let mut cursor = 0;
    // True right after a link; governs whether a separating space is owed.
    let mut after_link = false;

    for Citation { anchor, event_id } in citations {
        let Some(found) = find_anchor(&stripped, &anchor, cursor) else {
            // Heuristic mismatch: the anchor is not in the display text.
            continue;
        };

        push_text(&mut segments, &stripped[cursor..found.0], after_link);
        let matched = &stripped[found.0..found.1];

        if events.iter().any(|e| e.id == event_id) {
            segments.push(Segment::link(matched, event_id));
            after_link = true;
        } else {
            // Unresolved identifier: the span stays plain prose.
            push_text(&mut segments, matched, after_link);
            after_link = false;
        }
        cursor = found.1;
    }

    push_text(&mut segments, &stripped[cursor..], after_link);

    if segments.is_empty() {
        segments.push(Segment::text(stripped));
    }
    segments
}

/// Locate the first case-insensitive occurrence of `anchor` at or after
/// `from`. Regex metacharacters in the anchor are escaped before matching.
fn find_anchor(stripped: &str, anchor: &str, from: usize) -> Option<(usize, usize)> {
    let pattern = Regex::new(&format!("(?i){}", regex::escape(anchor))).ok()?;
    pattern
        .find_at(stripped, from)
        .map(|m| (m.start(), m.end()))
}

/// Append a text chunk, applying the link spacing rules.
///
/// A chunk that precedes a link ends with exactly one space; a chunk that
/// follows a link gets a leading space only when it starts alphanumeric or
/// whitespace, so punctuation stays attached to the link text.
fn push_text(segments: &mut Vec<Segment>, chunk: &str, after_link: bool) {
    let Some(first) = chunk.chars().next() else {
        return;
    };

    let text = if after_link {
        if first.is_alphanumeric() || first.is_whitespace() {
            format!(" {}", chunk.trim_start())
        } else {
            chunk.to_string()
        }
    } else {
        chunk.to_string()
    };

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}
