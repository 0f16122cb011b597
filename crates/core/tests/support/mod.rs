//! Shared test helpers for `slotwise-core` integration tests.
//!
//! These helpers provide a scriptable in-memory calendar and a fixed clock so
//! engine tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use slotwise_core::{FixedClock, SchedulingService};
use slotwise_domain::{RetrySettings, SchedulerConfig};

pub use calendar::MockCalendarProvider;

/// Monday 2026-03-02 at the given UTC wall time.
pub fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    on_day(2, hour, minute)
}

/// A day in March 2026 (the 2nd is a Monday).
pub fn on_day(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
}

/// Default policy with millisecond backoff so retry tests stay fast.
pub fn fast_config() -> SchedulerConfig {
    SchedulerConfig {
        retry: RetrySettings {
            max_attempts: 3,
            base_delay_ms: 1,
            multiplier: 2.0,
            max_delay_ms: 2,
            jitter: false,
        },
        request_timeout_ms: 1_000,
        ..SchedulerConfig::default()
    }
}

/// Engine over `provider` with the clock frozen at `now`.
pub fn engine_at(provider: &MockCalendarProvider, now: DateTime<Utc>) -> SchedulingService {
    SchedulingService::new(Arc::new(provider.clone()), Arc::new(FixedClock::new(now)), fast_config())
        .expect("valid engine configuration")
}

/// Engine with a custom configuration.
pub fn engine_with(
    provider: &MockCalendarProvider,
    now: DateTime<Utc>,
    config: SchedulerConfig,
) -> SchedulingService {
    SchedulingService::new(Arc::new(provider.clone()), Arc::new(FixedClock::new(now)), config)
        .expect("valid engine configuration")
}
