//! Merging feed and internal events into one chronological list.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::event::CalendarEvent;
use crate::feed::FeedFetcher;
use crate::ics::MAX_FEED_EVENTS;
use crate::store::EventStore;
use crate::tags::{EventTag, available_tags};

/// Concatenate `external` then `internal` and sort by start, stably, so equal
/// starts keep that order. Invalid starts go last.
pub fn merge_events(
    external: Vec<CalendarEvent>,
    internal: Vec<CalendarEvent>,
) -> Vec<CalendarEvent> {
    let mut merged = external;
    merged.extend(internal);
    sort_chronologically(&mut merged);
    merged
}

pub fn sort_chronologically(events: &mut [CalendarEvent]) {
    events.sort_by_cached_key(SortKey::of);
}

/// Events starting at or after `now`. Events with an invalid start are dropped.
pub fn upcoming(events: Vec<CalendarEvent>, now: DateTime<Utc>) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .filter(|event| event.start_date().instant().is_some_and(|start| start >= now))
        .collect()
}

pub fn filter_by_tag(events: Vec<CalendarEvent>, tag: EventTag) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .filter(|event| event.tags().contains(tag))
        .collect()
}

/// Active tags present across `events`, in first-seen order.
pub fn tags_in(events: &[CalendarEvent]) -> Vec<EventTag> {
    available_tags(events.iter().map(CalendarEvent::tags))
}

/// Valid instants first, in order; invalid ones after, all equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Valid(DateTime<Utc>),
    Invalid,
}

impl SortKey {
    fn of(event: &CalendarEvent) -> Self {
        match event.start_date().instant() {
            Some(instant) => SortKey::Valid(instant),
            None => SortKey::Invalid,
        }
    }
}

/// The aggregate calendar read: fetch the feed, read the store, merge.
///
/// Nothing is cached between calls. Neither source can fail the read; an
/// unavailable one simply contributes no events.
pub struct Agenda {
    fetcher: Option<FeedFetcher>,
    store: Arc<dyn EventStore>,
    limit: usize,
}

impl Agenda {
    pub fn new(fetcher: Option<FeedFetcher>, store: Arc<dyn EventStore>) -> Self {
        Agenda {
            fetcher,
            store,
            limit: MAX_FEED_EVENTS,
        }
    }

    /// Cap on feed events per read.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    pub async fn events(&self) -> Vec<CalendarEvent> {
        let external = match &self.fetcher {
            Some(fetcher) => fetcher.fetch_events(self.limit).await,
            None => Vec::new(),
        };

        let internal = match self.store.list() {
            Ok(stored) => stored.into_iter().map(CalendarEvent::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Event store unavailable");
                Vec::new()
            }
        };

        merge_events(external, internal)
    }
}
