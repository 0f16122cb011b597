//! Meeting requests produced by the upstream suggestion pipeline

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_MEETING_DURATION_MINUTES, MAX_PREP_TIME_MINUTES};
use crate::errors::{Result, SchedulingError};
use crate::impl_domain_status_conversions;

/// How urgently a meeting must land on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl_domain_status_conversions!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

/// Immutable description of what must be scheduled.
///
/// Built through [`MeetingRequest::builder`]; `build` validates every
/// invariant against the supplied "now", so a `MeetingRequest` in hand is
/// always schedulable in principle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequest {
    title: String,
    description: Option<String>,
    duration_minutes: u32,
    attendees: Vec<String>,
    preferred_times: Vec<DateTime<Utc>>,
    deadline: Option<DateTime<Utc>>,
    priority: Priority,
    location: Option<String>,
    is_recurring: bool,
    requires_prep: bool,
    prep_time_minutes: u32,
    allow_weekends: bool,
}

impl MeetingRequest {
    pub fn builder(title: impl Into<String>, duration_minutes: u32) -> MeetingRequestBuilder {
        MeetingRequestBuilder::new(title, duration_minutes)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn attendees(&self) -> &[String] {
        &self.attendees
    }

    /// Preferred start instants in the caller's order of preference.
    pub fn preferred_times(&self) -> &[DateTime<Utc>] {
        &self.preferred_times
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_recurring(&self) -> bool {
        self.is_recurring
    }

    pub fn requires_prep(&self) -> bool {
        self.requires_prep
    }

    /// Protected prep time before the meeting; zero unless prep is required.
    pub fn prep_duration(&self) -> Duration {
        if self.requires_prep {
            Duration::minutes(i64::from(self.prep_time_minutes))
        } else {
            Duration::zero()
        }
    }

    pub fn allow_weekends(&self) -> bool {
        self.allow_weekends
    }
}

/// Fluent builder for [`MeetingRequest`].
#[derive(Debug, Clone)]
pub struct MeetingRequestBuilder {
    request: MeetingRequest,
}

impl MeetingRequestBuilder {
    fn new(title: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            request: MeetingRequest {
                title: title.into(),
                description: None,
                duration_minutes,
                attendees: Vec::new(),
                preferred_times: Vec::new(),
                deadline: None,
                priority: Priority::default(),
                location: None,
                is_recurring: false,
                requires_prep: false,
                prep_time_minutes: 0,
                allow_weekends: false,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.request.description = Some(description.into());
        self
    }

    pub fn attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    pub fn preferred_times(mut self, times: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        self.request.preferred_times = times.into_iter().collect();
        self
    }

    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.request.deadline = Some(deadline);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.request.priority = priority;
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.request.location = Some(location.into());
        self
    }

    pub fn recurring(mut self, is_recurring: bool) -> Self {
        self.request.is_recurring = is_recurring;
        self
    }

    pub fn prep_time(mut self, minutes: u32) -> Self {
        self.request.requires_prep = true;
        self.request.prep_time_minutes = minutes;
        self
    }

    pub fn allow_weekends(mut self, allow: bool) -> Self {
        self.request.allow_weekends = allow;
        self
    }

    /// Validate and produce the request.
    ///
    /// # Errors
    /// `InvalidRequest` when the title is blank, the duration is zero or longer
    /// than a day, prep time is unreasonably long, or the deadline is not
    /// after `now`.
    pub fn build(self, now: DateTime<Utc>) -> Result<MeetingRequest> {
        let mut request = self.request;

        request.title = request.title.trim().to_string();
        if request.title.is_empty() {
            return Err(SchedulingError::invalid_field("title", "must not be empty"));
        }
        if request.duration_minutes == 0 {
            return Err(SchedulingError::invalid_field("duration", "must be greater than zero"));
        }
        if request.duration_minutes > MAX_MEETING_DURATION_MINUTES {
            return Err(SchedulingError::invalid_field(
                "duration",
                format!("must not exceed {MAX_MEETING_DURATION_MINUTES} minutes"),
            ));
        }
        if request.requires_prep && request.prep_time_minutes > MAX_PREP_TIME_MINUTES {
            return Err(SchedulingError::invalid_field(
                "prepTime",
                format!("must not exceed {MAX_PREP_TIME_MINUTES} minutes"),
            ));
        }
        if let Some(deadline) = request.deadline {
            if deadline <= now {
                return Err(SchedulingError::invalid_field(
                    "deadline",
                    format!("{} is not in the future", deadline.to_rfc3339()),
                ));
            }
        }

        request.attendees.retain(|attendee| !attendee.trim().is_empty());
        let mut seen = Vec::with_capacity(request.preferred_times.len());
        request.preferred_times.retain(|time| {
            if seen.contains(time) {
                false
            } else {
                seen.push(*time);
                true
            }
        });

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    #[test]
    fn builds_with_defaults() {
        let request = MeetingRequest::builder("Sync", 30).build(now()).unwrap();
        assert_eq!(request.priority(), Priority::Medium);
        assert_eq!(request.duration(), Duration::minutes(30));
        assert_eq!(request.prep_duration(), Duration::zero());
        assert!(request.attendees().is_empty());
        assert!(!request.allow_weekends());
    }

    #[test]
    fn rejects_invalid_duration_and_title() {
        assert!(matches!(
            MeetingRequest::builder("Sync", 0).build(now()),
            Err(SchedulingError::InvalidRequest(_))
        ));
        assert!(MeetingRequest::builder("Sync", 24 * 60 + 1).build(now()).is_err());
        assert!(MeetingRequest::builder("   ", 30).build(now()).is_err());
    }

    #[test]
    fn rejects_deadline_not_in_future() {
        let result = MeetingRequest::builder("Sync", 30).deadline(now()).build(now());
        assert!(matches!(result, Err(SchedulingError::InvalidRequest(msg)) if msg.contains("deadline")));

        let ok = MeetingRequest::builder("Sync", 30)
            .deadline(now() + Duration::hours(1))
            .build(now());
        assert!(ok.is_ok());
    }

    #[test]
    fn prep_time_only_counts_when_required() {
        let request = MeetingRequest::builder("Review", 60).prep_time(20).build(now()).unwrap();
        assert!(request.requires_prep());
        assert_eq!(request.prep_duration(), Duration::minutes(20));
    }

    #[test]
    fn deduplicates_preferred_times_keeping_order() {
        let first = now() + Duration::hours(2);
        let second = now() + Duration::hours(1);
        let request = MeetingRequest::builder("Sync", 30)
            .preferred_times([first, second, first])
            .attendees(["a@example.com", " ", "b@example.com"])
            .build(now())
            .unwrap();
        assert_eq!(request.preferred_times(), &[first, second]);
        assert_eq!(request.attendees().len(), 2);
    }

    #[test]
    fn priority_parses_from_boundary_strings() {
        assert_eq!("urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert!("critical".parse::<Priority>().is_err());
        assert!(Priority::Urgent > Priority::Low);
    }
}
