//! Fetching the public calendar feed.
//!
//! One GET per read, no retries and no caching. Callers that only want events
//! use [`FeedFetcher::fetch_events`], which swallows failures.

use url::Url;

use crate::error::{TablicaError, TablicaResult};
use crate::event::CalendarEvent;
use crate::ics::IcsEvents;

const GOOGLE_ICAL_BASE: &str = "https://calendar.google.com/calendar/ical";
const GOOGLE_CALENDAR_PAGE: &str = "https://calendar.google.com/calendar/u/0";

pub struct FeedFetcher {
    client: reqwest::Client,
    url: String,
    html_link: Option<String>,
}

impl FeedFetcher {
    /// Fetcher for an ICS URL. `webcal://` links are fetched over https.
    pub fn new(url: &str) -> TablicaResult<Self> {
        let url = normalize_feed_url(url);
        Url::parse(&url)
            .map_err(|e| TablicaError::Config(format!("Invalid feed URL '{url}': {e}")))?;

        Ok(FeedFetcher {
            client: reqwest::Client::new(),
            url,
            html_link: None,
        })
    }

    /// Fetcher for the public export of a Google calendar.
    pub fn google(calendar_id: &str) -> TablicaResult<Self> {
        Ok(Self::new(&google_ics_url(calendar_id))?
            .with_html_link(format!("{}?cid={}", GOOGLE_CALENDAR_PAGE, calendar_id)))
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Link to the calendar's public page, attached to every fetched event.
    pub fn with_html_link(mut self, link: impl Into<String>) -> Self {
        self.html_link = Some(link.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw document. Transport failures and non-2xx statuses are errors.
    pub async fn fetch(&self) -> TablicaResult<String> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TablicaError::Feed(format!("{} returned {}", self.url, status)));
        }

        Ok(response.text().await?)
    }

    /// Fetch and parse up to `limit` events. Any failure yields no events.
    pub async fn fetch_events(&self, limit: usize) -> Vec<CalendarEvent> {
        let text = match self.fetch().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Calendar feed unavailable");
                return Vec::new();
            }
        };

        let events = IcsEvents::new(&text);
        let events: Vec<CalendarEvent> = match &self.html_link {
            Some(link) => events.with_html_link(link.clone()).take(limit).collect(),
            None => events.take(limit).collect(),
        };

        tracing::debug!(url = %self.url, count = events.len(), "Fetched calendar feed");
        events
    }
}

/// Public ICS export URL of a Google calendar.
pub fn google_ics_url(calendar_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(calendar_id.as_bytes()).collect();
    format!("{}/{}/public/basic.ics", GOOGLE_ICAL_BASE, encoded)
}

pub fn normalize_feed_url(url: &str) -> String {
    let url = url.trim();
    match url.strip_prefix("webcal://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}
