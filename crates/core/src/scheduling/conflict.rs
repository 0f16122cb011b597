//! Conflict detection against the calendar of record

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use slotwise_domain::{ConflictReport, ExistingEvent, Result, TimeInterval};
use tracing::{debug, instrument};

use super::interval::{overlaps, with_buffer};
use super::ports::CalendarDataProvider;
use super::retry::{provider_failure, ProviderRetry};

/// Events that block `proposed`.
///
/// An event blocks when it is not cancelled, is not `exclude_event_id`, and
/// its buffered interval overlaps the buffered proposal.
pub fn find_conflicts(
    events: &[ExistingEvent],
    proposed: &TimeInterval,
    exclude_event_id: Option<&str>,
    buffer_minutes: u32,
) -> Vec<ExistingEvent> {
    let padded = with_buffer(proposed, buffer_minutes);
    events
        .iter()
        .filter(|event| event.status.blocks_time())
        .filter(|event| exclude_event_id != Some(event.id.as_str()))
        .filter(|event| overlaps(&with_buffer(&event.interval, buffer_minutes), &padded))
        .cloned()
        .collect()
}

/// Window that must be fetched to see every event that could conflict with
/// `proposed`. Both sides carry a buffer, so the reach is twice the buffer.
pub fn fetch_window(proposed: &TimeInterval, buffer_minutes: u32) -> TimeInterval {
    proposed.padded(Duration::minutes(2 * i64::from(buffer_minutes)))
}

/// Read-only conflict checks against the calendar provider.
pub struct ConflictDetector {
    provider: Arc<dyn CalendarDataProvider>,
    retry: Arc<ProviderRetry>,
    buffer_minutes: u32,
}

impl ConflictDetector {
    pub fn new(
        provider: Arc<dyn CalendarDataProvider>,
        retry: Arc<ProviderRetry>,
        buffer_minutes: u32,
    ) -> Self {
        Self { provider, retry, buffer_minutes }
    }

    pub fn buffer_minutes(&self) -> u32 {
        self.buffer_minutes
    }

    /// Report the events that would collide with `[start, end)`.
    ///
    /// # Errors
    /// - `InvalidRequest` when `end <= start`, before any provider call
    /// - `ProviderUnavailable` once transient fetch failures exhaust retries
    /// - `PermanentProviderError` when the provider rejects the read
    pub async fn detect_conflicts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_event_id: Option<&str>,
    ) -> Result<ConflictReport> {
        let proposed = TimeInterval::new(start, end)?;
        self.check_interval(proposed, exclude_event_id).await
    }

    /// Same as [`detect_conflicts`](Self::detect_conflicts) for an interval
    /// that is already validated.
    #[instrument(skip(self, proposed), fields(start = %proposed.start(), end = %proposed.end()))]
    pub async fn check_interval(
        &self,
        proposed: TimeInterval,
        exclude_event_id: Option<&str>,
    ) -> Result<ConflictReport> {
        let window = fetch_window(&proposed, self.buffer_minutes);
        let context = format!("{}..{}", window.start().to_rfc3339(), window.end().to_rfc3339());

        let events = self
            .retry
            .call("list_events", &context, || {
                self.provider.list_events(window.start(), window.end())
            })
            .await
            .map_err(provider_failure)?;

        let conflicts = find_conflicts(&events, &proposed, exclude_event_id, self.buffer_minutes);
        debug!(fetched = events.len(), conflicts = conflicts.len(), "conflict check complete");

        Ok(ConflictReport::new(proposed, conflicts))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use slotwise_domain::EventStatus;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn event(id: &str, start: (u32, u32), end: (u32, u32), status: EventStatus) -> ExistingEvent {
        let interval = TimeInterval::new(at(start.0, start.1), at(end.0, end.1)).unwrap();
        ExistingEvent::new(id, interval, status)
    }

    #[test]
    fn cancelled_and_excluded_events_never_conflict() {
        let events = vec![
            event("cancelled", (10, 0), (11, 0), EventStatus::Cancelled),
            event("moving", (10, 0), (11, 0), EventStatus::Confirmed),
            event("tentative", (10, 30), (11, 30), EventStatus::Tentative),
        ];
        let proposed = TimeInterval::new(at(10, 0), at(10, 30)).unwrap();

        let conflicts = find_conflicts(&events, &proposed, Some("moving"), 0);
        let ids: Vec<_> = conflicts.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tentative"]);
    }

    #[test]
    fn buffer_applies_to_both_sides() {
        let events = vec![event("standup", (9, 0), (10, 0), EventStatus::Confirmed)];

        let right_after = TimeInterval::new(at(10, 0), at(10, 30)).unwrap();
        assert!(find_conflicts(&events, &right_after, None, 0).is_empty());
        assert_eq!(find_conflicts(&events, &right_after, None, 5).len(), 1);

        let gap_of_two_buffers = TimeInterval::new(at(10, 10), at(10, 40)).unwrap();
        assert!(find_conflicts(&events, &gap_of_two_buffers, None, 5).is_empty());
    }

    #[test]
    fn fetch_window_reaches_twice_the_buffer() {
        let proposed = TimeInterval::new(at(10, 0), at(10, 30)).unwrap();
        let window = fetch_window(&proposed, 5);
        assert_eq!(window.start(), at(9, 50));
        assert_eq!(window.end(), at(10, 40));
    }
}
