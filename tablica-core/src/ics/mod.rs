//! ICS feed parsing.
//!
//! A small, forgiving reader for the subset of RFC 5545 that public calendar
//! exports use: `VEVENT` blocks with a handful of text and date properties.
//! Structurally broken input never fails, it just yields fewer events.

mod lines;
mod parse;
mod property;

pub use lines::LogicalLines;
pub use parse::{IcsEvents, MAX_FEED_EVENTS, parse_ics, parse_ics_with_limit};
pub use property::{ContentLine, PropertyKind, unescape_text};
