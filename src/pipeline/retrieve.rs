//! Context retrieval - applying a structured filter to the event corpus.
//!
//! Retrieval is deliberately recall-biased: the two filter axes combine
//! with OR, so a loosely-specified filter still leaves the answer stage
//! enough grounding material.

use std::collections::HashMap;

use crate::types::{ContextFilter, EventRecord};

/// Tags must occur in more than this many events to enter the vocabulary.
const TAG_FREQUENCY_THRESHOLD: usize = 2;

/// Apply a filter to the corpus.
///
/// An empty filter returns the corpus unchanged. Otherwise an event is
/// retained if it matches at least one text term (case-insensitive
/// substring against title or description) or at least one tag
/// (case-insensitive exact match).
pub fn apply_filter(filter: &ContextFilter, events: &[EventRecord]) -> Vec<EventRecord> {
    if filter.is_empty() {
        return events.to_vec();
    }

    events
        .iter()
        .filter(|event| matches_text(filter, event) || matches_tags(filter, event))
        .cloned()
        .collect()
}

fn matches_text(filter: &ContextFilter, event: &EventRecord) -> bool {
    let title = event.title.to_lowercase();
    let description = event.description.to_lowercase();
    filter.text.iter().any(|term| {
        let term = term.to_lowercase();
        title.contains(&term) || description.contains(&term)
    })
}

fn matches_tags(filter: &ContextFilter, event: &EventRecord) -> bool {
    filter.tags.iter().any(|tag| event.has_tag(tag))
}

/// Build the known-tag vocabulary for filter synthesis.
///
/// Only tags occurring in more than two events qualify. Counting and
/// deduplication are case-folded, output is sorted by case-insensitive
/// key, and the original casing of the first occurrence is preserved.
pub fn frequent_tags(events: &[EventRecord]) -> Vec<String> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();

    for event in events {
        for tag in &event.tags {
            let key = tag.to_lowercase();
            counts
                .entry(key)
                .and_modify(|(_, n)| *n += 1)
                .or_insert_with(|| (tag.clone(), 1));
        }
    }

    let mut tags: Vec<String> = counts
        .into_values()
        .filter(|(_, n)| *n > TAG_FREQUENCY_THRESHOLD)
        .map(|(original, _)| original)
        .collect();

    tags.sort_by_key(|t| t.to_lowercase());
    tags
}
