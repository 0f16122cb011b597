use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_core::{CalendarDataProvider, ProviderError};
use slotwise_domain::{EventMetadata, EventStatus, ExistingEvent, TimeInterval};

/// Hook run on every `list_events` call; an event it returns is written to
/// the calendar before the read is answered. Used to simulate bookings that
/// land between search and commit.
pub type RaceHook = Box<dyn Fn(DateTime<Utc>, DateTime<Utc>) -> Option<ExistingEvent> + Send + Sync>;

/// In-memory mock for `CalendarDataProvider`.
///
/// Clones share state, so a test can keep a handle while the engine owns
/// another. Failures are queued per operation and consumed in order.
#[derive(Default, Clone)]
pub struct MockCalendarProvider {
    events: Arc<Mutex<Vec<ExistingEvent>>>,
    list_failures: Arc<Mutex<VecDeque<ProviderError>>>,
    create_failures: Arc<Mutex<VecDeque<ProviderError>>>,
    race_hook: Arc<Mutex<Option<RaceHook>>>,
    list_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
}

impl MockCalendarProvider {
    /// Create a new mock seeded with the provided events.
    pub fn new(events: Vec<ExistingEvent>) -> Self {
        Self { events: Arc::new(Mutex::new(events)), ..Self::default() }
    }

    /// Convenience helper for adding a confirmed event.
    pub fn with_busy(self, id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.insert(busy(id, start, end));
        self
    }

    pub fn insert(&self, event: ExistingEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<ExistingEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Fail the next `times` reads with `error`.
    pub fn fail_lists(&self, times: usize, error: ProviderError) {
        let mut queue = self.list_failures.lock().unwrap();
        queue.extend(std::iter::repeat(error).take(times));
    }

    /// Fail the next `times` writes with `error`.
    pub fn fail_creates(&self, times: usize, error: ProviderError) {
        let mut queue = self.create_failures.lock().unwrap();
        queue.extend(std::iter::repeat(error).take(times));
    }

    pub fn on_list(&self, hook: RaceHook) {
        *self.race_hook.lock().unwrap() = Some(hook);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarDataProvider for MockCalendarProvider {
    async fn list_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<ExistingEvent>, ProviderError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.list_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        if let Some(hook) = self.race_hook.lock().unwrap().as_ref() {
            if let Some(rival) = hook(window_start, window_end) {
                self.insert(rival);
            }
        }

        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.interval.start() < window_end && event.interval.end() > window_start)
            .cloned()
            .collect())
    }

    async fn create_event(
        &self,
        interval: TimeInterval,
        metadata: &EventMetadata,
    ) -> Result<ExistingEvent, ProviderError> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.create_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let event = ExistingEvent::new(format!("created-{call}"), interval, EventStatus::Confirmed)
            .with_title(metadata.title.clone());
        self.insert(event.clone());
        Ok(event)
    }
}

/// A confirmed event over `[start, end)`.
pub fn busy(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ExistingEvent {
    ExistingEvent::new(id, TimeInterval::new(start, end).unwrap(), EventStatus::Confirmed)
}
