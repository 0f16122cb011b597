//! Scheduling service - wires the engine components together

use std::sync::Arc;

use chrono::{DateTime, Utc};
use slotwise_domain::{
    ConflictReport, MeetingRequest, Result, SchedulerConfig, SchedulingResult, SlotCandidate,
};

use super::auto_scheduler::AutoScheduler;
use super::availability::AvailabilitySearch;
use super::conflict::ConflictDetector;
use super::ports::{CalendarDataProvider, Clock};
use super::retry::ProviderRetry;

/// The calendar scheduling engine for one user's calendar.
///
/// All components share one provider, one clock and one retry policy. The
/// service holds no per-request state.
pub struct SchedulingService {
    config: Arc<SchedulerConfig>,
    clock: Arc<dyn Clock>,
    detector: Arc<ConflictDetector>,
    search: Arc<AvailabilitySearch>,
    auto_scheduler: AutoScheduler,
}

impl SchedulingService {
    /// Validate `config` and build the engine.
    ///
    /// # Errors
    /// `SchedulingError::Config` when the configuration is inconsistent.
    pub fn new(
        provider: Arc<dyn CalendarDataProvider>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let retry = Arc::new(ProviderRetry::from_config(&config)?);

        let detector = Arc::new(ConflictDetector::new(
            Arc::clone(&provider),
            Arc::clone(&retry),
            config.buffer_minutes,
        ));
        let search = Arc::new(AvailabilitySearch::new(
            Arc::clone(&provider),
            Arc::clone(&retry),
            Arc::clone(&clock),
            Arc::clone(&config),
        )?);
        let auto_scheduler = AutoScheduler::new(
            Arc::clone(&search),
            Arc::clone(&detector),
            provider,
            retry,
            Arc::clone(&config),
        );

        Ok(Self { config, clock, detector, search, auto_scheduler })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current instant according to the engine's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn find_optimal_meeting_times(
        &self,
        request: &MeetingRequest,
        search_days: u32,
    ) -> Result<Vec<SlotCandidate>> {
        self.search.find_optimal_meeting_times(request, search_days).await
    }

    pub async fn auto_schedule_meeting(&self, request: &MeetingRequest) -> Result<SchedulingResult> {
        self.auto_scheduler.auto_schedule_meeting(request).await
    }

    pub async fn detect_conflicts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_event_id: Option<&str>,
    ) -> Result<ConflictReport> {
        self.detector.detect_conflicts(start, end, exclude_event_id).await
    }
}
