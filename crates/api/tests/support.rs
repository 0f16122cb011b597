//! Shared helpers for `slotwise-api` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use slotwise_api::{AppContext, MeetingRequestDto};
use slotwise_core::FixedClock;
use slotwise_domain::{EventStatus, ExistingEvent, RetrySettings, SchedulerConfig, TimeInterval};
use slotwise_infra::InMemoryCalendarProvider;

/// Monday 2026-03-02 at the given UTC wall time.
pub fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    on_day(2, hour, minute)
}

/// A day in March 2026 (the 2nd is a Monday).
pub fn on_day(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
}

pub fn busy(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ExistingEvent {
    ExistingEvent::new(id, TimeInterval::new(start, end).unwrap(), EventStatus::Confirmed)
}

/// Default policy with millisecond backoff so outage tests stay fast.
pub fn fast_config() -> SchedulerConfig {
    SchedulerConfig {
        retry: RetrySettings {
            max_attempts: 3,
            base_delay_ms: 1,
            multiplier: 2.0,
            max_delay_ms: 2,
            jitter: false,
        },
        ..SchedulerConfig::default()
    }
}

/// Context over `provider` with the clock frozen at Monday 08:00 UTC.
pub fn context(provider: Arc<InMemoryCalendarProvider>) -> Arc<AppContext> {
    let ctx = AppContext::with_provider(fast_config(), provider, Arc::new(FixedClock::new(monday(8, 0))))
        .expect("valid context");
    Arc::new(ctx)
}

pub fn meeting(title: &str, minutes: u32) -> MeetingRequestDto {
    MeetingRequestDto {
        title: title.to_string(),
        duration_minutes: minutes,
        ..MeetingRequestDto::default()
    }
}
