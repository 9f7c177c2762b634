//! Calendar events as served to the front-end.

use serde::{Deserialize, Serialize};

use crate::date::{EventDate, normalize};
use crate::display;
use crate::tags::TagSet;

/// A calendar event from the public feed or the internal store.
///
/// `start` and `end` hold the canonical string form of an [`EventDate`].
/// Tags are not a field: they are derived from the text on every call to
/// [`CalendarEvent::tags`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Public page of the source calendar
    #[serde(rename = "htmlLink", default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

impl CalendarEvent {
    pub fn start_date(&self) -> EventDate {
        normalize(&self.start)
    }

    pub fn end_date(&self) -> EventDate {
        normalize(&self.end)
    }

    pub fn tags(&self) -> TagSet {
        TagSet::for_event(&self.title, &self.description)
    }

    pub fn is_all_day(&self) -> bool {
        display::is_all_day(&self.start_date(), &self.end_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::EventTag;

    #[test]
    fn test_json_shape() {
        let event: CalendarEvent = serde_json::from_str(
            r#"{"id":"1","title":"Wywiadówka [4-6]","start":"2024-03-01T17:00:00Z","end":"2024-03-01T18:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(event.description, "");
        assert_eq!(event.tags().primary(), EventTag::Range4To6);
        assert!(!event.is_all_day());

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("htmlLink").is_none());

        let linked = CalendarEvent {
            html_link: Some("https://calendar.example".into()),
            ..event
        };
        let json = serde_json::to_value(&linked).unwrap();
        assert_eq!(json["htmlLink"], "https://calendar.example");
    }
}
