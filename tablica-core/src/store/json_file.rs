//! Whole-file JSON storage.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{EventStore, NewEvent, StoredEvent, create_in, delete_in, sort_by_start, update_in};
use crate::error::{TablicaError, TablicaResult};

/// Keeps every internal event in one JSON array on disk. A missing file is an
/// empty store.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> TablicaResult<Vec<StoredEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, events: &[StoredEvent]) -> TablicaResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(events)?;
        std::fs::write(&self.path, content)?;

        Ok(())
    }

    /// Load, apply `f`, and write back, holding the lock throughout.
    fn modify<T>(
        &self,
        f: impl FnOnce(&mut Vec<StoredEvent>) -> TablicaResult<T>,
    ) -> TablicaResult<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| TablicaError::Store("Event store lock poisoned".into()))?;

        let mut events = self.load()?;
        let result = f(&mut events)?;
        self.save(&events)?;

        Ok(result)
    }
}

impl EventStore for JsonFileStore {
    fn list(&self) -> TablicaResult<Vec<StoredEvent>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| TablicaError::Store("Event store lock poisoned".into()))?;

        let mut events = self.load()?;
        sort_by_start(&mut events);
        Ok(events)
    }

    fn create(&self, event: NewEvent) -> TablicaResult<StoredEvent> {
        self.modify(|events| create_in(events, event))
    }

    fn update(&self, id: &str, event: NewEvent) -> TablicaResult<StoredEvent> {
        self.modify(|events| update_in(events, id, event))
    }

    fn delete(&self, id: &str) -> TablicaResult<bool> {
        self.modify(|events| Ok(delete_in(events, id)))
    }
}
