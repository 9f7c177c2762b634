//! Aggregate calendar endpoints

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use tablica_core::agenda::{filter_by_tag, tags_in, upcoming};
use tablica_core::{CalendarEvent, EventTag, TagSet};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(list_events))
        .route("/calendar/tags", get(list_tags))
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub tag: Option<String>,
    #[serde(default)]
    pub upcoming: bool,
}

/// Event as returned by the API, with its derived tags.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub tags: TagSet,
    pub primary_tag: EventTag,
    pub all_day: bool,
}

impl From<CalendarEvent> for EventResponse {
    fn from(event: CalendarEvent) -> Self {
        let tags = event.tags();
        EventResponse {
            primary_tag: tags.primary(),
            all_day: event.is_all_day(),
            tags,
            event,
        }
    }
}

/// GET /calendar - Feed and user events, merged and sorted by start
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let tag = query
        .tag
        .as_deref()
        .filter(|tag| !tag.is_empty())
        .map(str::parse::<EventTag>)
        .transpose()?;

    let mut events = state.agenda().events().await;
    if query.upcoming {
        events = upcoming(events, Utc::now());
    }
    if let Some(tag) = tag {
        events = filter_by_tag(events, tag);
    }

    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// GET /calendar/tags - Tags present across the current events
async fn list_tags(State(state): State<AppState>) -> Json<Vec<EventTag>> {
    let events = state.agenda().events().await;
    Json(tags_in(&events))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tablica_core::store::NewEvent;
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_state;

    fn seeded_state() -> AppState {
        let state = test_state(None);
        for (title, start) in [
            ("Zebranie [RR]", "2099-09-02T18:00"),
            ("Apel [1-3]", "2099-09-01"),
            ("Wycieczka [4 - 6]", "2000-05-10T08:00"),
        ] {
            state
                .store()
                .create(NewEvent {
                    title: title.into(),
                    start: start.into(),
                    ..Default::default()
                })
                .unwrap();
        }
        state
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = crate::app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn titles(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|event| event["title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_lists_sorted_events_with_tags() {
        let (status, body) = get_json(seeded_state(), "/calendar").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            titles(&body),
            vec!["Wycieczka [4 - 6]", "Apel [1-3]", "Zebranie [RR]"]
        );

        let apel = &body[1];
        assert_eq!(apel["primaryTag"], "1-3");
        assert_eq!(apel["tags"], serde_json::json!(["1-3"]));
        assert_eq!(apel["start"], "2099-09-01T00:00:00");
        assert_eq!(apel["allDay"], true);
        assert_eq!(body[2]["allDay"], false);
    }

    #[tokio::test]
    async fn test_filters_by_tag_and_upcoming() {
        let (_, body) = get_json(seeded_state(), "/calendar?tag=RR").await;
        assert_eq!(titles(&body), vec!["Zebranie [RR]"]);

        let (_, body) = get_json(seeded_state(), "/calendar?upcoming=true").await;
        assert_eq!(titles(&body), vec!["Apel [1-3]", "Zebranie [RR]"]);

        let (_, body) = get_json(seeded_state(), "/calendar?tag=none").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tag_is_rejected() {
        let (status, body) = get_json(seeded_state(), "/calendar?tag=9-12").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_lists_available_tags() {
        let (status, body) = get_json(seeded_state(), "/calendar/tags").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(["4-6", "1-3", "RR"]));
    }

    #[tokio::test]
    async fn test_empty_calendar() {
        let (status, body) = get_json(test_state(None), "/calendar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}
