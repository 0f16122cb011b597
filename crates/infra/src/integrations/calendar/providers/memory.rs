//! In-memory calendar provider
//!
//! Thread-safe event store for local runs and tests. Failures can be queued
//! per operation to exercise the engine's retry and race handling.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use slotwise_core::{overlaps, CalendarDataProvider, ProviderError};
use slotwise_domain::{EventMetadata, EventStatus, ExistingEvent, TimeInterval};
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Default)]
struct FailurePlan {
    list: VecDeque<ProviderError>,
    create: VecDeque<ProviderError>,
}

/// Calendar held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCalendarProvider {
    events: RwLock<Vec<ExistingEvent>>,
    failures: Mutex<FailurePlan>,
    reject_overlaps: bool,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl InMemoryCalendarProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = ExistingEvent>) -> Self {
        Self { events: RwLock::new(events.into_iter().collect()), ..Self::default() }
    }

    /// Answer `create_event` with `Conflict` when the slot overlaps a
    /// blocking event, like a calendar that enforces exclusive bookings.
    pub fn reject_overlaps(mut self, reject: bool) -> Self {
        self.reject_overlaps = reject;
        self
    }

    pub fn insert(&self, event: ExistingEvent) {
        self.events.write().push(event);
    }

    /// Snapshot of every stored event, cancelled ones included.
    pub fn events(&self) -> Vec<ExistingEvent> {
        self.events.read().clone()
    }

    /// Fail the next `list_events` call with `error`. Queued failures are
    /// consumed in order.
    pub fn fail_next_list(&self, error: ProviderError) {
        self.failures.lock().list.push_back(error);
    }

    /// Fail the next `create_event` call with `error`.
    pub fn fail_next_create(&self, error: ProviderError) {
        self.failures.lock().create.push_back(error);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarDataProvider for InMemoryCalendarProvider {
    #[instrument(skip(self))]
    async fn list_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<ExistingEvent>, ProviderError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.lock().list.pop_front() {
            debug!(%error, "injected list failure");
            return Err(error);
        }

        let window = TimeInterval::new(window_start, window_end)
            .map_err(|e| ProviderError::Validation(e.to_string()))?;

        let mut found: Vec<ExistingEvent> = self
            .events
            .read()
            .iter()
            .filter(|event| overlaps(&event.interval, &window))
            .cloned()
            .collect();
        found.sort_by_key(|event| event.interval);
        Ok(found)
    }

    #[instrument(skip(self, metadata), fields(title = %metadata.title))]
    async fn create_event(
        &self,
        interval: TimeInterval,
        metadata: &EventMetadata,
    ) -> Result<ExistingEvent, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.lock().create.pop_front() {
            debug!(%error, "injected create failure");
            return Err(error);
        }

        let mut events = self.events.write();
        if self.reject_overlaps {
            if let Some(taken) = events
                .iter()
                .find(|event| event.status.blocks_time() && overlaps(&event.interval, &interval))
            {
                return Err(ProviderError::Conflict(format!("slot overlaps event {}", taken.id)));
            }
        }

        let event = ExistingEvent::new(Uuid::now_v7().to_string(), interval, EventStatus::Confirmed)
            .with_title(metadata.title.clone());
        events.push(event.clone());
        Ok(event)
    }
}
