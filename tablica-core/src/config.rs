//! Global tablica configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::agenda::Agenda;
use crate::error::{TablicaError, TablicaResult};
use crate::feed::FeedFetcher;
use crate::ics::MAX_FEED_EVENTS;
use crate::store::{EventStore, JsonFileStore};

static DEFAULT_STORE_PATH: &str = "~/.local/share/tablica/events.json";
static DEFAULT_BIND: &str = "127.0.0.1:4096";

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_feed_events() -> usize {
    MAX_FEED_EVENTS
}

/// Configuration at ~/.config/tablica/config.toml, overridable with
/// `TABLICA_*` environment variables (e.g. `TABLICA_ADMIN_PASSWORD`).
#[derive(Debug, Clone, Deserialize)]
pub struct TablicaConfig {
    /// ICS feed to show. Takes precedence over `google_calendar_id`.
    #[serde(default)]
    pub feed_url: Option<String>,

    #[serde(default)]
    pub google_calendar_id: Option<String>,

    #[serde(default = "default_max_feed_events")]
    pub max_feed_events: usize,

    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    #[serde(default = "default_bind")]
    pub bind: String,

    /// Without a password, user events cannot be added, edited or removed.
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl Default for TablicaConfig {
    fn default() -> Self {
        TablicaConfig {
            feed_url: None,
            google_calendar_id: None,
            max_feed_events: MAX_FEED_EVENTS,
            store_path: default_store_path(),
            bind: default_bind(),
            admin_password: None,
        }
    }
}

impl TablicaConfig {
    pub fn config_path() -> TablicaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TablicaError::Config("Could not determine config directory".into()))?
            .join("tablica");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first use.
    pub fn load() -> TablicaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> TablicaResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("TABLICA").try_parsing(true))
            .build()
            .map_err(|e| TablicaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TablicaError::Config(e.to_string()))
    }

    pub fn store_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.store_path.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The configured feed, if any.
    pub fn feed_fetcher(&self) -> TablicaResult<Option<FeedFetcher>> {
        let feed_url = self.feed_url.as_deref().filter(|url| !url.trim().is_empty());
        let calendar_id = self
            .google_calendar_id
            .as_deref()
            .filter(|id| !id.trim().is_empty());

        match (feed_url, calendar_id) {
            (Some(url), _) => FeedFetcher::new(url).map(Some),
            (None, Some(id)) => FeedFetcher::google(id.trim()).map(Some),
            (None, None) => Ok(None),
        }
    }

    pub fn open_store(&self) -> Arc<dyn EventStore> {
        Arc::new(JsonFileStore::new(self.store_path()))
    }

    pub fn agenda(&self) -> TablicaResult<Agenda> {
        Ok(Agenda::new(self.feed_fetcher()?, self.open_store()).with_limit(self.max_feed_events))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TablicaResult<()> {
        let contents = format!(
            "\
# tablica configuration

# Public ICS feed (webcal:// links work too):
# feed_url = \"https://example.com/calendar.ics\"

# Or the id of a public Google calendar:
# google_calendar_id = \"abc123@group.calendar.google.com\"

# How many feed events to show:
# max_feed_events = {}

# Where events added through the board are kept:
# store_path = \"{}\"

# Address the HTTP API listens on:
# bind = \"{}\"

# Password required to add, edit or remove events.
# Prefer the TABLICA_ADMIN_PASSWORD environment variable.
# admin_password = \"\"
",
            MAX_FEED_EVENTS, DEFAULT_STORE_PATH, DEFAULT_BIND
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TablicaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TablicaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TablicaConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.max_feed_events, 10);
        assert_eq!(config.bind, "127.0.0.1:4096");
        assert!(config.feed_url.is_none());
        assert!(config.feed_fetcher().unwrap().is_none());
    }

    #[test]
    fn test_default_file_is_all_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        TablicaConfig::create_default_config(&path).unwrap();

        let config = TablicaConfig::load_from(&path).unwrap();
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_reads_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "google_calendar_id = \"szkola@group.calendar.google.com\"\n\
             max_feed_events = 5\n\
             store_path = \"~/tablica/events.json\"\n",
        )
        .unwrap();

        let config = TablicaConfig::load_from(&path).unwrap();
        assert_eq!(config.max_feed_events, 5);
        assert!(!config.store_path().starts_with("~"));

        let fetcher = config.feed_fetcher().unwrap().unwrap();
        assert!(fetcher.url().ends_with("/szkola%40group.calendar.google.com/public/basic.ics"));
    }

    #[test]
    fn test_feed_url_wins_over_google_id() {
        let config = TablicaConfig {
            feed_url: Some("webcal://example.com/feed.ics".into()),
            google_calendar_id: Some("ignored".into()),
            ..Default::default()
        };

        let fetcher = config.feed_fetcher().unwrap().unwrap();
        assert_eq!(fetcher.url(), "https://example.com/feed.ics");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_feed_events = \"many\"\n").unwrap();

        assert!(matches!(
            TablicaConfig::load_from(&path),
            Err(TablicaError::Config(_))
        ));
    }
}
