//! `VEVENT` extraction.

use uuid::Uuid;

use crate::date::{EventDate, normalize_in};
use crate::event::CalendarEvent;
use crate::ics::lines::LogicalLines;
use crate::ics::property::{ContentLine, PropertyKind, unescape_text};

/// Number of feed events served per read.
pub const MAX_FEED_EVENTS: usize = 10;

/// Parse an ICS document, keeping at most [`MAX_FEED_EVENTS`] events.
pub fn parse_ics(text: &str) -> Vec<CalendarEvent> {
    parse_ics_with_limit(text, MAX_FEED_EVENTS)
}

pub fn parse_ics_with_limit(text: &str, limit: usize) -> Vec<CalendarEvent> {
    IcsEvents::new(text).take(limit).collect()
}

enum ParseState {
    OutsideEvent,
    InsideEvent(EventBuilder),
}

/// Properties collected for the `VEVENT` currently being read.
#[derive(Default)]
struct EventBuilder {
    uid: Option<String>,
    title: Option<String>,
    start: Option<EventDate>,
    end: Option<EventDate>,
    description: Option<String>,
    location: Option<String>,
    /// Depth of nested components such as `VALARM`, whose properties are skipped
    nested: usize,
}

impl EventBuilder {
    fn apply(&mut self, line: &ContentLine<'_>) {
        let Some(kind) = line.kind() else {
            return;
        };

        match kind {
            PropertyKind::Summary => self.title = Some(line.value.to_string()),
            PropertyKind::DtStart => self.start = Some(normalize_in(line.value, line.param("TZID"))),
            PropertyKind::DtEnd => self.end = Some(normalize_in(line.value, line.param("TZID"))),
            PropertyKind::Description => self.description = Some(unescape_text(line.value)),
            PropertyKind::Location => self.location = Some(line.value.to_string()),
            PropertyKind::Uid => self.uid = Some(line.value.to_string()),
        }
    }

    /// Requires `SUMMARY` and `DTSTART`; anything less is dropped.
    fn build(self, html_link: Option<&str>) -> Option<CalendarEvent> {
        let title = self.title?;
        let start = self.start?.to_string();
        let end = self.end.map(|e| e.to_string()).unwrap_or_else(|| start.clone());
        let id = self.uid.unwrap_or_else(|| placeholder_id(&title, &start, &end));

        Some(CalendarEvent {
            id,
            title,
            start,
            end,
            description: self.description.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            html_link: html_link.map(str::to_string),
        })
    }
}

/// Stable id for events without a `UID`, so repeated parses agree.
fn placeholder_id(title: &str, start: &str, end: &str) -> String {
    let key = format!("{}\u{1f}{}\u{1f}{}", title, start, end);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

/// Lazy sequence of events in document order.
///
/// Blocks missing a title or start are skipped; a truncated trailing block is
/// never emitted.
pub struct IcsEvents<'a> {
    lines: LogicalLines<'a>,
    state: ParseState,
    html_link: Option<String>,
}

impl<'a> IcsEvents<'a> {
    pub fn new(text: &'a str) -> Self {
        IcsEvents {
            lines: LogicalLines::new(text),
            state: ParseState::OutsideEvent,
            html_link: None,
        }
    }

    /// Attach a link to the source calendar to every event.
    pub fn with_html_link(mut self, link: impl Into<String>) -> Self {
        self.html_link = Some(link.into());
        self
    }
}

impl Iterator for IcsEvents<'_> {
    type Item = CalendarEvent;

    fn next(&mut self) -> Option<CalendarEvent> {
        for line in self.lines.by_ref() {
            let marker = line.trim_end();

            match &mut self.state {
                ParseState::InsideEvent(_) if marker == "BEGIN:VEVENT" => {
                    tracing::debug!("Dropping VEVENT without END:VEVENT");
                    self.state = ParseState::InsideEvent(EventBuilder::default());
                }
                ParseState::OutsideEvent => {
                    if marker == "BEGIN:VEVENT" {
                        self.state = ParseState::InsideEvent(EventBuilder::default());
                    }
                }
                ParseState::InsideEvent(builder) if builder.nested > 0 => {
                    if marker.starts_with("BEGIN:") {
                        builder.nested += 1;
                    } else if marker.starts_with("END:") {
                        builder.nested -= 1;
                    }
                }
                ParseState::InsideEvent(builder) => {
                    if marker == "END:VEVENT" {
                        let finished = std::mem::replace(&mut self.state, ParseState::OutsideEvent);
                        if let ParseState::InsideEvent(builder) = finished {
                            match builder.build(self.html_link.as_deref()) {
                                Some(event) => return Some(event),
                                None => {
                                    tracing::debug!("Dropping VEVENT without SUMMARY or DTSTART")
                                }
                            }
                        }
                    } else if marker.starts_with("BEGIN:") {
                        builder.nested = 1;
                    } else if let Some(content) = ContentLine::parse(&line) {
                        builder.apply(&content);
                    }
                }
            }
        }

        None
    }
}
