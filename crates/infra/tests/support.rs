//! Shared helpers for `slotwise-infra` integration tests.

#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use slotwise_domain::{RetrySettings, SchedulerConfig};
use slotwise_infra::{GoogleCalendarConfig, GoogleCalendarProvider};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-access-token";
pub const EVENTS_PATH: &str = "/calendars/primary/events";

/// Monday 2026-03-02 at the given UTC wall time.
pub fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

/// Provider pointed at `server` with a short request timeout.
pub fn google_provider(server: &MockServer) -> GoogleCalendarProvider {
    google_provider_with(server, |config| config)
}

pub fn google_provider_with(
    server: &MockServer,
    customize: impl FnOnce(GoogleCalendarConfig) -> GoogleCalendarConfig,
) -> GoogleCalendarProvider {
    let config = GoogleCalendarConfig::new("primary", TEST_TOKEN)
        .with_base_url(server.uri())
        .with_request_timeout(Duration::from_millis(500));
    GoogleCalendarProvider::new(customize(config)).expect("provider should build")
}

/// A timed event as returned by `events.list`.
pub fn google_event(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "status": "confirmed",
        "summary": format!("Event {id}"),
        "start": { "dateTime": start.to_rfc3339() },
        "end": { "dateTime": end.to_rfc3339() }
    })
}

pub fn events_page(items: Vec<Value>, next_page_token: Option<&str>) -> Value {
    let mut page = json!({ "kind": "calendar#events", "timeZone": "UTC", "items": items });
    if let Some(token) = next_page_token {
        page["nextPageToken"] = json!(token);
    }
    page
}

/// Engine policy with millisecond backoff.
pub fn fast_config() -> SchedulerConfig {
    SchedulerConfig {
        retry: RetrySettings {
            max_attempts: 3,
            base_delay_ms: 1,
            multiplier: 2.0,
            max_delay_ms: 2,
            jitter: false,
        },
        request_timeout_ms: 2_000,
        ..SchedulerConfig::default()
    }
}
