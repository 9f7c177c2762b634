use std::sync::Arc;

use anyhow::Result;
use tablica_core::agenda::Agenda;
use tablica_core::config::TablicaConfig;
use tablica_core::store::EventStore;

use crate::routes::AppError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // Nothing is cached: every read fetches the feed and reads the store again
    agenda: Arc<Agenda>,
    admin_password: Option<String>,
}

impl AppState {
    pub fn new(agenda: Agenda, admin_password: Option<String>) -> Self {
        AppState {
            agenda: Arc::new(agenda),
            admin_password: admin_password.filter(|password| !password.is_empty()),
        }
    }

    pub fn from_config(config: &TablicaConfig) -> Result<Self> {
        Ok(Self::new(config.agenda()?, config.admin_password.clone()))
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        self.agenda.store()
    }

    /// Plain comparison against the configured password.
    pub fn check_password(&self, password: Option<&str>) -> Result<(), AppError> {
        let Some(expected) = self.admin_password.as_deref() else {
            return Err(AppError::forbidden("Editing is disabled"));
        };

        if password != Some(expected) {
            return Err(AppError::unauthorized("Invalid password"));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_state(admin_password: Option<&str>) -> AppState {
    use tablica_core::store::MemoryStore;

    let agenda = Agenda::new(None, Arc::new(MemoryStore::new()));
    AppState::new(agenda, admin_password.map(String::from))
}
