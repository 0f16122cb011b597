//! Availability search
//!
//! Enumerates candidate starts over the search window, drops every candidate
//! whose effective interval (prep included) conflicts with the calendar, then
//! scores and ranks the survivors.
//!
//! The calendar is read once per search: the padded span covering all
//! candidates is split into day-sized chunks that are fetched concurrently.
//! Each candidate is then checked in memory with [`find_conflicts`], the same
//! predicate the [`ConflictDetector`](super::conflict::ConflictDetector) uses.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt, TryStreamExt};
use slotwise_domain::{
    ExistingEvent, MeetingRequest, Result, SchedulerConfig, SlotCandidate, TimeInterval,
};
use tracing::{debug, info, instrument};

use super::conflict::{fetch_window, find_conflicts};
use super::interval::effective_interval;
use super::ports::{CalendarDataProvider, Clock};
use super::retry::{provider_failure, ProviderRetry};
use super::scoring::SlotScorer;

/// Quarter-hour steps tried when a local time falls in a DST gap.
const DST_GAP_STEPS: u32 = 12;

/// Finds and ranks open slots for a meeting request.
pub struct AvailabilitySearch {
    provider: Arc<dyn CalendarDataProvider>,
    retry: Arc<ProviderRetry>,
    clock: Arc<dyn Clock>,
    config: Arc<SchedulerConfig>,
    tz: Tz,
}

impl AvailabilitySearch {
    /// # Errors
    /// `SchedulingError::Config` if the working-hours timezone is unknown.
    pub fn new(
        provider: Arc<dyn CalendarDataProvider>,
        retry: Arc<ProviderRetry>,
        clock: Arc<dyn Clock>,
        config: Arc<SchedulerConfig>,
    ) -> Result<Self> {
        let tz = config.working_hours.tz()?;
        Ok(Self { provider, retry, clock, config, tz })
    }

    /// Ranked, conflict-free candidates within the next `search_days`.
    ///
    /// An empty result means "no availability" and is not an error.
    ///
    /// # Errors
    /// Provider failures only: `ProviderUnavailable` after retries are
    /// exhausted, `PermanentProviderError` when the provider rejects a read.
    #[instrument(skip(self, request), fields(title = request.title(), priority = %request.priority()))]
    pub async fn find_optimal_meeting_times(
        &self,
        request: &MeetingRequest,
        search_days: u32,
    ) -> Result<Vec<SlotCandidate>> {
        let now = self.clock.now();
        let Some(window) = search_window(request, now, search_days) else {
            debug!("search window is empty");
            return Ok(Vec::new());
        };

        let starts = self.candidate_starts(request, &window, now);
        if starts.is_empty() {
            debug!("no candidate starts inside working hours");
            return Ok(Vec::new());
        }

        let mut slots = Vec::with_capacity(starts.len());
        for start in starts {
            let meeting = TimeInterval::from_start(start, request.duration_minutes())?;
            let occupied = effective_interval(request, start)?;
            slots.push((meeting, occupied));
        }

        let events = self.fetch_events(&slots).await?;
        let buffer = self.config.buffer_minutes;
        let free: Vec<TimeInterval> = slots
            .into_iter()
            .filter(|(_, occupied)| find_conflicts(&events, occupied, None, buffer).is_empty())
            .map(|(meeting, _)| meeting)
            .collect();

        let (Some(earliest), Some(latest)) =
            (free.iter().map(TimeInterval::start).min(), free.iter().map(TimeInterval::start).max())
        else {
            info!(events = events.len(), "no conflict-free slot in window");
            return Ok(Vec::new());
        };

        let scorer = SlotScorer::new(&self.config.scoring, self.tz, request, earliest, latest);
        let mut candidates: Vec<SlotCandidate> = free
            .into_iter()
            .map(|meeting| {
                let (score, factors) = scorer.score(&meeting);
                SlotCandidate::new(meeting, score, factors)
            })
            .collect();

        candidates.sort_by(SlotCandidate::ranking);
        candidates.truncate(self.config.max_results);

        info!(
            events = events.len(),
            candidates = candidates.len(),
            top_score = candidates.first().map(|c| c.score),
            "availability search complete"
        );
        Ok(candidates)
    }

    /// Preferred times first, then the working-hours grid, without
    /// duplicates. Every start lies in the window and ends inside it.
    fn candidate_starts(
        &self,
        request: &MeetingRequest,
        window: &TimeInterval,
        now: DateTime<Utc>,
    ) -> Vec<DateTime<Utc>> {
        let duration = request.duration();
        let fits = |start: DateTime<Utc>| start >= now && start + duration <= window.end();

        let mut seen = HashSet::new();
        let mut starts = Vec::new();

        for preferred in request.preferred_times() {
            if fits(*preferred) && seen.insert(*preferred) {
                starts.push(*preferred);
            }
        }

        let step = Duration::minutes(i64::from(self.config.slot_granularity_minutes.max(1)));
        let last_day = window.end().with_timezone(&self.tz).date_naive();
        let mut day = now.with_timezone(&self.tz).date_naive();

        while day <= last_day {
            let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
            if request.allow_weekends() || !weekend {
                if let Some((open, close)) = self.working_day(day) {
                    let mut start = open;
                    while start + duration <= close {
                        if fits(start) && seen.insert(start) {
                            starts.push(start);
                        }
                        start += step;
                    }
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        starts
    }

    /// Working-hours bounds of a local calendar day, in UTC.
    fn working_day(&self, day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let hours = &self.config.working_hours;
        let open = self.local_instant(day, hours.start_hour)?;
        let close = if hours.end_hour >= 24 {
            self.local_instant(day.succ_opt()?, 0)?
        } else {
            self.local_instant(day, hours.end_hour)?
        };
        Some((open, close))
    }

    /// `hour:00` local on `day`. A time inside a DST gap moves forward to the
    /// first quarter hour that exists.
    fn local_instant(&self, day: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
        let mut naive = day.and_hms_opt(hour, 0, 0)?;
        for _ in 0..=DST_GAP_STEPS {
            if let Some(local) = self.tz.from_local_datetime(&naive).earliest() {
                return Some(local.with_timezone(&Utc));
            }
            naive += Duration::minutes(15);
        }
        None
    }

    /// Every event that could conflict with any of `slots`, deduplicated.
    async fn fetch_events(&self, slots: &[(TimeInterval, TimeInterval)]) -> Result<Vec<ExistingEvent>> {
        let (Some(first), Some(last)) = (
            slots.iter().map(|(_, occupied)| occupied.start()).min(),
            slots.iter().map(|(_, occupied)| occupied.end()).max(),
        ) else {
            return Ok(Vec::new());
        };
        let span = fetch_window(&TimeInterval::new(first, last)?, self.config.buffer_minutes);

        let chunks = day_chunks(&span);
        debug!(chunks = chunks.len(), "fetching calendar window");

        let batches: Vec<Vec<ExistingEvent>> = stream::iter(chunks)
            .map(|chunk| self.fetch_chunk(chunk))
            .buffered(self.config.max_concurrent_fetches.max(1))
            .try_collect()
            .await?;

        let mut by_id = BTreeMap::new();
        for event in batches.into_iter().flatten() {
            by_id.entry(event.id.clone()).or_insert(event);
        }
        Ok(by_id.into_values().collect())
    }

    async fn fetch_chunk(&self, chunk: TimeInterval) -> Result<Vec<ExistingEvent>> {
        let context = format!("{}..{}", chunk.start().to_rfc3339(), chunk.end().to_rfc3339());
        self.retry
            .call("list_events", &context, || self.provider.list_events(chunk.start(), chunk.end()))
            .await
            .map_err(provider_failure)
    }
}

/// `[now, now + days]`, clipped to the deadline. `None` when empty.
fn search_window(
    request: &MeetingRequest,
    now: DateTime<Utc>,
    search_days: u32,
) -> Option<TimeInterval> {
    let mut end = now + Duration::days(i64::from(search_days));
    if let Some(deadline) = request.deadline() {
        end = end.min(deadline);
    }
    TimeInterval::new(now, end).ok()
}

fn day_chunks(span: &TimeInterval) -> Vec<TimeInterval> {
    let mut chunks = Vec::new();
    let mut cursor = span.start();
    while cursor < span.end() {
        let next = (cursor + Duration::days(1)).min(span.end());
        chunks.extend(TimeInterval::new(cursor, next).ok());
        cursor = next;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn window_is_clipped_to_deadline() {
        let now = at(2, 8, 0);
        let request = MeetingRequest::builder("Sync", 30).deadline(at(3, 12, 0)).build(now).unwrap();

        let window = search_window(&request, now, 14).unwrap();
        assert_eq!(window.start(), now);
        assert_eq!(window.end(), at(3, 12, 0));
        assert!(search_window(&request, now, 0).is_none());
    }

    #[test]
    fn chunks_cover_span_without_gaps() {
        let span = TimeInterval::new(at(2, 8, 50), at(4, 18, 10)).unwrap();
        let chunks = day_chunks(&span);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].start(), span.start());
        assert_eq!(chunks[2].end(), span.end());
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }
}
