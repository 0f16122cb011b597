//! Google Calendar provider (REST API v3)
//!
//! Reads use `events.list` with `singleEvents=true` so recurring series come
//! back expanded into instances; every page is followed. Writes use
//! `events.insert`. HTTP failures are classified by
//! [`classify_status`](crate::errors::classify_status) so the engine can tell
//! transient outages from permanent rejections.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use slotwise_core::{CalendarDataProvider, ProviderError};
use slotwise_domain::{EventMetadata, EventStatus, ExistingEvent, Result, SchedulingError, TimeInterval};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::{classify_status, classify_transport};

pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Upper bound on `maxResults` accepted by `events.list`.
const MAX_PAGE_SIZE: u32 = 2500;

/// Connection settings for one calendar.
#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    pub base_url: String,
    pub calendar_id: String,
    pub access_token: String,
    pub request_timeout: Duration,
    pub page_size: u32,
    /// Pages followed per `list_events` call before giving up.
    pub max_pages: u32,
}

impl GoogleCalendarConfig {
    pub fn new(calendar_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: GOOGLE_CALENDAR_API_BASE.to_string(),
            calendar_id: calendar_id.into(),
            access_token: access_token.into(),
            request_timeout: Duration::from_secs(10),
            page_size: 250,
            max_pages: 20,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Google Calendar provider
pub struct GoogleCalendarProvider {
    client: Client,
    events_url: Url,
    config: GoogleCalendarConfig,
}

impl GoogleCalendarProvider {
    /// # Errors
    /// `SchedulingError::Config` for an unusable base URL, an empty calendar
    /// id or token, or an HTTP client that cannot be built.
    pub fn new(config: GoogleCalendarConfig) -> Result<Self> {
        if config.calendar_id.trim().is_empty() {
            return Err(SchedulingError::Config("google calendar id must not be empty".into()));
        }
        if config.access_token.trim().is_empty() {
            return Err(SchedulingError::Config("google access token must not be empty".into()));
        }
        if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
            return Err(SchedulingError::Config(format!(
                "google page size must be within 1..={MAX_PAGE_SIZE}"
            )));
        }

        let events_url = events_url(&config.base_url, &config.calendar_id)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SchedulingError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, events_url, config })
    }

    pub fn calendar_id(&self) -> &str {
        &self.config.calendar_id
    }

    async fn send(&self, builder: RequestBuilder) -> std::result::Result<Response, ProviderError> {
        let response = builder
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        let error = classify_status(status, &headers, &body);
        debug!(status = status.as_u16(), %error, "google calendar request failed");
        Err(error)
    }
}

#[async_trait]
impl CalendarDataProvider for GoogleCalendarProvider {
    #[instrument(skip(self), fields(calendar_id = %self.config.calendar_id))]
    async fn list_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> std::result::Result<Vec<ExistingEvent>, ProviderError> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..self.config.max_pages.max(1) {
            let mut query = vec![
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("showDeleted", "false".to_string()),
                ("timeMin", window_start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("timeMax", window_end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("maxResults", self.config.page_size.to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self.send(self.client.get(self.events_url.clone()).query(&query)).await?;
            let body: GoogleEventsResponse = response.json().await.map_err(classify_transport)?;
            let fallback_tz = body.time_zone.as_deref().and_then(|name| name.parse::<Tz>().ok());

            // An unreadable event may still block time, so it fails the read.
            for item in body.items {
                let id = item.id.clone();
                let cancelled = item.status.as_deref() == Some("cancelled");
                match item.into_existing_event(fallback_tz) {
                    Ok(Some(event)) => events.push(event),
                    Ok(None) => debug!(event_id = %id, "skipping free-time event"),
                    Err(reason) if cancelled => {
                        debug!(event_id = %id, %reason, "skipping unreadable cancelled event")
                    }
                    Err(reason) => {
                        warn!(event_id = %id, %reason, "unreadable event in calendar window");
                        return Err(ProviderError::Validation(format!(
                            "event {id} has unreadable times: {reason}"
                        )));
                    }
                }
            }

            match body.next_page_token {
                Some(token) => {
                    debug!(page, fetched = events.len(), "following next page");
                    page_token = Some(token);
                }
                None => return Ok(events),
            }
        }

        Err(ProviderError::Validation(format!(
            "event list exceeded {} pages; narrow the window",
            self.config.max_pages
        )))
    }

    #[instrument(skip(self, metadata), fields(calendar_id = %self.config.calendar_id, title = %metadata.title))]
    async fn create_event(
        &self,
        interval: TimeInterval,
        metadata: &EventMetadata,
    ) -> std::result::Result<ExistingEvent, ProviderError> {
        let body = GoogleEventInsert::new(interval, metadata);
        let response = self.send(self.client.post(self.events_url.clone()).json(&body)).await?;
        let created: GoogleCalendarEvent = response.json().await.map_err(classify_transport)?;

        let id = created.id.clone();
        match created.into_existing_event(None) {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Ok(ExistingEvent::new(id, interval, EventStatus::Confirmed)
                .with_title(metadata.title.clone())),
            Err(reason) => Err(ProviderError::Validation(format!(
                "created event {id} has unreadable times: {reason}"
            ))),
        }
    }
}

fn events_url(base_url: &str, calendar_id: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| SchedulingError::Config(format!("invalid google base url '{base_url}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| SchedulingError::Config(format!("google base url '{base_url}' cannot hold a path")))?
        .pop_if_empty()
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
    next_page_token: Option<String>,
    time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCalendarEvent {
    id: String,
    status: Option<String>,
    summary: Option<String>,
    transparency: Option<String>,
    start: EventDateTime,
    end: EventDateTime,
}

impl GoogleCalendarEvent {
    /// `Ok(None)` for events marked as free time, which never block a slot.
    fn into_existing_event(
        self,
        fallback_tz: Option<Tz>,
    ) -> std::result::Result<Option<ExistingEvent>, String> {
        if self.transparency.as_deref() == Some("transparent") {
            return Ok(None);
        }

        let status = match self.status.as_deref() {
            Some("cancelled") => EventStatus::Cancelled,
            Some("tentative") => EventStatus::Tentative,
            _ => EventStatus::Confirmed,
        };
        let start = self.start.resolve(fallback_tz)?;
        let end = self.end.resolve(fallback_tz)?;
        let interval = TimeInterval::new(start, end).map_err(|e| e.to_string())?;

        let mut event = ExistingEvent::new(self.id, interval, status);
        if let Some(summary) = self.summary.filter(|s| !s.trim().is_empty()) {
            event = event.with_title(summary);
        }
        Ok(Some(event))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl EventDateTime {
    /// Timed events carry an RFC 3339 instant. All-day events carry a date
    /// that starts at local midnight in the event's (or calendar's) zone.
    fn resolve(&self, fallback_tz: Option<Tz>) -> std::result::Result<DateTime<Utc>, String> {
        if let Some(raw) = &self.date_time {
            return DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("invalid dateTime '{raw}': {e}"));
        }

        let raw = self.date.as_deref().ok_or("event time has neither dateTime nor date")?;
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{raw}': {e}"))?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or("invalid midnight")?;

        let tz = self.time_zone.as_deref().and_then(|name| name.parse::<Tz>().ok()).or(fallback_tz);
        match tz {
            Some(tz) => tz
                .from_local_datetime(&midnight)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .ok_or_else(|| format!("date '{raw}' has no midnight in {tz}")),
            None => Ok(Utc.from_utc_datetime(&midnight)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventInsert<'a> {
    summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    start: EventDateTime,
    end: EventDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<GoogleAttendee<'a>>,
}

impl<'a> GoogleEventInsert<'a> {
    fn new(interval: TimeInterval, metadata: &'a EventMetadata) -> Self {
        let instant = |at: DateTime<Utc>| EventDateTime {
            date_time: Some(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            time_zone: Some("UTC".to_string()),
            ..EventDateTime::default()
        };
        Self {
            summary: &metadata.title,
            description: metadata.description.as_deref(),
            location: metadata.location.as_deref(),
            start: instant(interval.start()),
            end: instant(interval.end()),
            attendees: metadata.attendees.iter().map(|email| GoogleAttendee { email }).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GoogleAttendee<'a> {
    email: &'a str,
}
