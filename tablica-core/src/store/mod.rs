//! Storage for events added through the admin forms.
//!
//! Feed events are never stored; only internal events live here. Start and
//! end are kept as ISO-8601 strings.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::{EventDate, normalize};
use crate::error::{TablicaError, TablicaResult};
use crate::event::CalendarEvent;

/// An internal event as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when creating or updating an internal event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Persistence for internal events, keyed by an opaque string id.
pub trait EventStore: Send + Sync {
    /// All events, ordered by start ascending.
    fn list(&self) -> TablicaResult<Vec<StoredEvent>>;

    fn create(&self, event: NewEvent) -> TablicaResult<StoredEvent>;

    /// Replace the fields of an existing event. Fails with `NotFound` for unknown ids.
    fn update(&self, id: &str, event: NewEvent) -> TablicaResult<StoredEvent>;

    /// Returns whether an event was removed.
    fn delete(&self, id: &str) -> TablicaResult<bool>;
}

/// Validated, normalized fields of a [`NewEvent`].
struct EventFields {
    title: String,
    start: String,
    end: String,
    description: Option<String>,
    location: Option<String>,
}

impl NewEvent {
    fn into_fields(self) -> TablicaResult<EventFields> {
        let title = self.title.trim().to_string();
        let start = self.start.trim().to_string();
        if title.is_empty() || start.is_empty() {
            return Err(TablicaError::Validation(
                "Title and start date are required".into(),
            ));
        }

        let end = self
            .end
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| start.clone());

        Ok(EventFields {
            title,
            start: to_warsaw_iso(&start),
            end: to_warsaw_iso(&end),
            description: self.description.filter(|d| !d.is_empty()),
            location: self.location.filter(|l| !l.is_empty()),
        })
    }
}

/// Store a wall-clock input (`YYYY-MM-DDTHH:MM`, as sent by `datetime-local`
/// fields) as the UTC instant it denotes in Europe/Warsaw. Values that
/// already carry `Z` or an offset, plain dates and unparseable input are kept.
pub fn to_warsaw_iso(value: &str) -> String {
    let date = normalize(value);
    match date {
        EventDate::Floating(_) => match date.instant() {
            Some(instant) => EventDate::Utc(instant).to_string(),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}

fn sort_by_start(events: &mut [StoredEvent]) {
    events.sort_by(|a, b| normalize(&a.start).chronological_cmp(&normalize(&b.start)));
}

fn create_in(events: &mut Vec<StoredEvent>, new: NewEvent) -> TablicaResult<StoredEvent> {
    let fields = new.into_fields()?;
    let event = StoredEvent {
        id: format!("user-{}", Uuid::new_v4()),
        title: fields.title,
        start: fields.start,
        end: fields.end,
        description: fields.description,
        location: fields.location,
        created_at: Utc::now(),
    };
    events.push(event.clone());
    Ok(event)
}

fn update_in(events: &mut [StoredEvent], id: &str, new: NewEvent) -> TablicaResult<StoredEvent> {
    let fields = new.into_fields()?;
    let event = events
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| TablicaError::NotFound(id.to_string()))?;

    event.title = fields.title;
    event.start = fields.start;
    event.end = fields.end;
    event.description = fields.description;
    event.location = fields.location;

    Ok(event.clone())
}

fn delete_in(events: &mut Vec<StoredEvent>, id: &str) -> bool {
    let before = events.len();
    events.retain(|e| e.id != id);
    events.len() != before
}

impl From<StoredEvent> for CalendarEvent {
    fn from(stored: StoredEvent) -> Self {
        CalendarEvent {
            id: stored.id,
            title: stored.title,
            start: normalize(&stored.start).to_string(),
            end: normalize(&stored.end).to_string(),
            description: stored.description.unwrap_or_default(),
            location: stored.location.unwrap_or_default(),
            html_link: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_input_is_read_as_warsaw_time() {
        assert_eq!(to_warsaw_iso("2024-01-15T14:30"), "2024-01-15T13:30:00Z");
        assert_eq!(to_warsaw_iso("2024-07-15T14:30"), "2024-07-15T12:30:00Z");
    }

    #[test]
    fn test_values_with_zone_are_kept() {
        assert_eq!(to_warsaw_iso("2024-01-15T14:30:00Z"), "2024-01-15T14:30:00Z");
        assert_eq!(
            to_warsaw_iso("2024-01-15T14:30:00+01:00"),
            "2024-01-15T14:30:00+01:00"
        );
        assert_eq!(to_warsaw_iso("2024-01-15"), "2024-01-15");
        assert_eq!(to_warsaw_iso("jutro"), "jutro");
    }

    #[test]
    fn test_missing_title_or_start_is_rejected() {
        let no_title = NewEvent {
            start: "2024-01-15T14:30".into(),
            ..Default::default()
        };
        assert!(matches!(
            no_title.into_fields(),
            Err(TablicaError::Validation(_))
        ));

        let no_start = NewEvent {
            title: "Zebranie".into(),
            ..Default::default()
        };
        assert!(matches!(
            no_start.into_fields(),
            Err(TablicaError::Validation(_))
        ));
    }

    #[test]
    fn test_end_defaults_to_start() {
        let fields = NewEvent {
            title: "Zebranie".into(),
            start: "2024-01-15T14:30".into(),
            end: Some(String::new()),
            description: Some(String::new()),
            location: None,
        }
        .into_fields()
        .unwrap();

        assert_eq!(fields.end, fields.start);
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_stored_event_converts_to_calendar_event() {
        let stored = StoredEvent {
            id: "user-1".into(),
            title: "Kiermasz [P]".into(),
            start: "2024-03-01T10:00:00.000Z".into(),
            end: "2024-03-01T12:00:00.000Z".into(),
            description: None,
            location: Some("Hol".into()),
            created_at: Utc::now(),
        };

        let event = CalendarEvent::from(stored);
        assert_eq!(event.start, "2024-03-01T10:00:00Z");
        assert_eq!(event.description, "");
        assert_eq!(event.location, "Hol");
    }

    #[test]
    fn test_stored_date_converts_to_local_midnight() {
        let stored = StoredEvent {
            id: "user-2".into(),
            title: "Dzień sportu".into(),
            start: "2024-03-01".into(),
            end: "2024-03-01".into(),
            description: None,
            location: None,
            created_at: Utc::now(),
        };

        let event = CalendarEvent::from(stored);
        assert_eq!(event.start, "2024-03-01T00:00:00");
        assert_eq!(event.end, "2024-03-01T00:00:00");
        assert!(event.is_all_day());
    }

    #[test]
    fn test_stored_event_json_shape() {
        let stored = StoredEvent {
            id: "user-1".into(),
            title: "Test".into(),
            start: "2024-03-01".into(),
            end: "2024-03-01".into(),
            description: None,
            location: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("description").is_none());
    }
}
