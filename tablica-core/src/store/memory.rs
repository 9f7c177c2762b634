//! In-process store, used by tests and when no store path is configured.

use std::sync::Mutex;

use super::{EventStore, NewEvent, StoredEvent, create_in, delete_in, sort_by_start, update_in};
use crate::error::{TablicaError, TablicaResult};

#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<Vec<StoredEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_events<T>(
        &self,
        f: impl FnOnce(&mut Vec<StoredEvent>) -> TablicaResult<T>,
    ) -> TablicaResult<T> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| TablicaError::Store("Event store lock poisoned".into()))?;
        f(&mut *events)
    }
}

impl EventStore for MemoryStore {
    fn list(&self) -> TablicaResult<Vec<StoredEvent>> {
        self.with_events(|events| {
            let mut listed = events.clone();
            sort_by_start(&mut listed);
            Ok(listed)
        })
    }

    fn create(&self, event: NewEvent) -> TablicaResult<StoredEvent> {
        self.with_events(|events| create_in(events, event))
    }

    fn update(&self, id: &str, event: NewEvent) -> TablicaResult<StoredEvent> {
        self.with_events(|events| update_in(events, id, event))
    }

    fn delete(&self, id: &str) -> TablicaResult<bool> {
        self.with_events(|events| Ok(delete_in(events, id)))
    }
}
