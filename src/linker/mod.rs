//! Turns raw bot replies into linkable output.
//!
//! Replies carry inline `[event:ID]` citation markers emitted by the answer
//! stage. This module scans those markers, derives a short anchor phrase for
//! each from the surrounding prose, strips the markers from the display
//! text, and renders the result as a sequence of text and link segments.

mod anchor;
mod render;

pub use anchor::{derive_anchor, scan_citations, AnchorConfig, Citation};
pub use render::{render_message, render_message_with, strip_markers, Segment};
