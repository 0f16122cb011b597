//! Auto-scheduler
//!
//! Books the best available slot with a check-then-commit protocol:
//!
//! ```text
//! Searching ──► Verifying ──► Committing ──► Committed
//!     │             │  ▲           │
//!     │             ▼  │           ▼
//!     │         ConflictRetry ◄────┘ (409 from provider)
//!     ▼             │
//!   Failed ◄────────┘ (retries exhausted)
//! ```
//!
//! Verification re-reads the calendar for exactly the candidate's effective
//! interval right before the write. When a candidate lost a race, the rival
//! bookings are remembered and every later candidate they also block is
//! skipped without another read. Each newly discovered rival costs one of the
//! `max_conflict_retries` retries.

use std::sync::Arc;

use slotwise_common::RetryError;
use slotwise_domain::{
    EventMetadata, ExistingEvent, FailureReason, MeetingRequest, Result, SchedulerConfig,
    SchedulingError, SchedulingResult, SlotCandidate,
};
use tracing::{debug, info, instrument, warn};

use super::availability::AvailabilitySearch;
use super::conflict::{find_conflicts, ConflictDetector};
use super::interval::effective_interval;
use super::ports::{CalendarDataProvider, ProviderError};
use super::retry::{provider_failure, ProviderRetry};

/// States of one auto-schedule run. Indices point into the ranked
/// candidate list produced by the search.
#[derive(Debug)]
enum Phase {
    Searching,
    Verifying(usize),
    Committing(usize),
    ConflictRetry { index: usize, rivals: Vec<ExistingEvent> },
    Committed { index: usize, event: ExistingEvent },
    Failed { reason: FailureReason, message: String, best: Option<usize> },
}

impl Phase {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed { .. } | Self::Failed { .. })
    }
}

/// Picks the top candidate and books it through the provider.
pub struct AutoScheduler {
    search: Arc<AvailabilitySearch>,
    detector: Arc<ConflictDetector>,
    provider: Arc<dyn CalendarDataProvider>,
    retry: Arc<ProviderRetry>,
    config: Arc<SchedulerConfig>,
}

impl AutoScheduler {
    pub fn new(
        search: Arc<AvailabilitySearch>,
        detector: Arc<ConflictDetector>,
        provider: Arc<dyn CalendarDataProvider>,
        retry: Arc<ProviderRetry>,
        config: Arc<SchedulerConfig>,
    ) -> Self {
        Self { search, detector, provider, retry, config }
    }

    /// Search, verify and commit.
    ///
    /// Expected failures (no availability, lost races, an unreachable
    /// provider) come back as [`SchedulingResult::Failed`].
    ///
    /// # Errors
    /// `PermanentProviderError` when the provider rejects a read or write
    /// for a reason other than a conflicting booking.
    #[instrument(skip(self, request), fields(title = request.title(), priority = %request.priority()))]
    pub async fn auto_schedule_meeting(&self, request: &MeetingRequest) -> Result<SchedulingResult> {
        let metadata = EventMetadata::from(request);
        let horizon = self.config.horizon_days(request.priority());

        let mut candidates: Vec<SlotCandidate> = Vec::new();
        let mut known_rivals: Vec<ExistingEvent> = Vec::new();
        let mut tried: u32 = 0;
        let mut conflict_retries: u32 = 0;
        let mut phase = Phase::Searching;

        while !phase.is_terminal() {
            debug!(?phase, "auto-schedule transition");
            phase = match phase {
                Phase::Searching => {
                    match self.search.find_optimal_meeting_times(request, horizon).await {
                        Ok(found) if found.is_empty() => Phase::Failed {
                            reason: FailureReason::NoAvailability,
                            message: format!("no free slot in the next {horizon} day(s)"),
                            best: None,
                        },
                        Ok(found) => {
                            candidates = found;
                            Phase::Verifying(0)
                        }
                        Err(SchedulingError::ProviderUnavailable(message)) => Phase::Failed {
                            reason: FailureReason::ProviderUnavailable,
                            message,
                            best: None,
                        },
                        Err(error) => return Err(error),
                    }
                }

                Phase::Verifying(index) => {
                    tried += 1;
                    let occupied = effective_interval(request, candidates[index].interval.start())?;
                    match self.detector.check_interval(occupied, None).await {
                        Ok(report) if report.has_conflict() => {
                            info!(
                                start = %candidates[index].interval.start(),
                                conflicts = report.conflicts().len(),
                                "candidate taken since search"
                            );
                            Phase::ConflictRetry { index, rivals: report.into_conflicts() }
                        }
                        Ok(_) => Phase::Committing(index),
                        Err(SchedulingError::ProviderUnavailable(message)) => Phase::Failed {
                            reason: FailureReason::ProviderUnavailable,
                            message,
                            best: Some(index),
                        },
                        Err(error) => return Err(error),
                    }
                }

                Phase::Committing(index) => {
                    let interval = candidates[index].interval;
                    let context = format!("{} @ {}", metadata.title, interval.start().to_rfc3339());
                    let created = self
                        .retry
                        .call("create_event", &context, || {
                            self.provider.create_event(interval, &metadata)
                        })
                        .await;

                    match created {
                        Ok(event) => Phase::Committed { index, event },
                        Err(RetryError::NonRetryable { source: ProviderError::Conflict(reason), .. }) => {
                            info!(start = %interval.start(), %reason, "provider reported a conflicting booking");
                            let occupied = effective_interval(request, interval.start())?;
                            match self.detector.check_interval(occupied, None).await {
                                Ok(report) => Phase::ConflictRetry { index, rivals: report.into_conflicts() },
                                Err(SchedulingError::ProviderUnavailable(message)) => Phase::Failed {
                                    reason: FailureReason::ProviderUnavailable,
                                    message,
                                    best: Some(index),
                                },
                                Err(error) => return Err(error),
                            }
                        }
                        Err(error) => match provider_failure(error) {
                            SchedulingError::ProviderUnavailable(message) => Phase::Failed {
                                reason: FailureReason::ProviderUnavailable,
                                message,
                                best: Some(index),
                            },
                            other => return Err(other),
                        },
                    }
                }

                Phase::ConflictRetry { index, rivals } => {
                    conflict_retries += 1;
                    known_rivals.extend(rivals);
                    let next = if conflict_retries > self.config.max_conflict_retries {
                        None
                    } else {
                        self.next_unblocked(request, &candidates, index + 1, &known_rivals)?
                    };
                    match next {
                        Some(next) => Phase::Verifying(next),
                        None => {
                            warn!(tried, conflict_retries, "giving up after repeated conflicts");
                            Phase::Failed {
                                reason: FailureReason::SchedulingConflict,
                                message: format!(
                                    "{tried} candidate(s) were taken before they could be booked"
                                ),
                                best: Some(0),
                            }
                        }
                    }
                }

                terminal @ (Phase::Committed { .. } | Phase::Failed { .. }) => terminal,
            };
        }

        let result = match phase {
            Phase::Committed { index, event } => {
                info!(event_id = %event.id, start = %event.interval.start(), tried, "meeting committed");
                SchedulingResult::Committed {
                    event,
                    candidate: candidates.swap_remove(index),
                    candidates_tried: tried,
                }
            }
            Phase::Failed { reason, message, best } => {
                warn!(%reason, %message, "auto-schedule failed");
                SchedulingResult::Failed {
                    reason,
                    message,
                    best_candidate: best.and_then(|i| candidates.get(i).cloned()),
                }
            }
            other => {
                return Err(SchedulingError::Internal(format!(
                    "auto-schedule stopped in non-terminal state {other:?}"
                )))
            }
        };
        Ok(result)
    }

    /// First candidate at or after `from` that none of `rivals` blocks.
    fn next_unblocked(
        &self,
        request: &MeetingRequest,
        candidates: &[SlotCandidate],
        from: usize,
        rivals: &[ExistingEvent],
    ) -> Result<Option<usize>> {
        for (index, candidate) in candidates.iter().enumerate().skip(from) {
            let occupied = effective_interval(request, candidate.interval.start())?;
            if find_conflicts(rivals, &occupied, None, self.config.buffer_minutes).is_empty() {
                if index > from {
                    debug!(skipped = index - from, "skipped candidates blocked by known rivals");
                }
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}
