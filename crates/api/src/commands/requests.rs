//! Request and response shapes at the boundary
//!
//! Inputs are loosely typed (priorities as strings, instants as RFC 3339)
//! and are converted into validated domain values before the engine sees
//! them. Conversion failures are `InvalidRequest`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotwise_domain::{MeetingRequest, Priority, Result, SchedulingError, SlotCandidate};

/// A meeting to schedule, as sent by callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequestDto {
    pub title: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub preferred_times: Vec<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    /// `low`, `medium`, `high` or `urgent`; `medium` when absent.
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub requires_prep: bool,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub allow_weekends: bool,
}

impl MeetingRequestDto {
    /// Validate into a [`MeetingRequest`] relative to `now`.
    ///
    /// # Errors
    /// `InvalidRequest` naming the first field that does not convert.
    pub fn into_domain(self, now: DateTime<Utc>) -> Result<MeetingRequest> {
        let preferred_times = self
            .preferred_times
            .iter()
            .map(|raw| parse_instant("preferredTimes", raw))
            .collect::<Result<Vec<_>>>()?;

        let mut builder = MeetingRequest::builder(self.title, self.duration_minutes)
            .attendees(self.attendees)
            .preferred_times(preferred_times)
            .recurring(self.is_recurring)
            .allow_weekends(self.allow_weekends);

        if let Some(description) = self.description {
            builder = builder.description(description);
        }
        if let Some(location) = self.location {
            builder = builder.location(location);
        }
        if let Some(raw) = self.deadline.as_deref() {
            builder = builder.deadline(parse_instant("deadline", raw)?);
        }
        if let Some(raw) = self.priority.as_deref() {
            let priority = raw
                .parse::<Priority>()
                .map_err(|e| SchedulingError::invalid_field("priority", e))?;
            builder = builder.priority(priority);
        }
        if self.requires_prep {
            builder = builder.prep_time(self.prep_time.unwrap_or(0));
        }

        builder.build(now)
    }
}

/// Input of the `suggest` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub request: MeetingRequestDto,
    /// Days to search ahead; defaults and limits come from configuration.
    #[serde(default)]
    pub search_days: Option<u32>,
}

/// Output of the `suggest` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub candidates: Vec<SlotCandidate>,
    pub count: usize,
}

impl From<Vec<SlotCandidate>> for SuggestResponse {
    fn from(candidates: Vec<SlotCandidate>) -> Self {
        Self { count: candidates.len(), candidates }
    }
}

/// Input of the `auto-schedule` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScheduleRequest {
    pub request: MeetingRequestDto,
}

/// Input of the `check-conflicts` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConflictsRequest {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub exclude_event_id: Option<String>,
}

impl CheckConflictsRequest {
    /// Parsed `(start, end)`. Ordering is checked by the engine.
    pub fn instants(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((parse_instant("start", &self.start)?, parse_instant("end", &self.end)?))
    }
}

fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulingError::invalid_field(field, format!("'{raw}' is not RFC 3339: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn dto(json: serde_json::Value) -> MeetingRequestDto {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn converts_camel_case_payload() {
        let request = dto(serde_json::json!({
            "title": "Quarterly planning",
            "durationMinutes": 60,
            "attendees": ["ana@example.com", "  "],
            "preferredTimes": ["2026-03-03T10:00:00+01:00"],
            "deadline": "2026-03-10T17:00:00Z",
            "priority": "HIGH",
            "requiresPrep": true,
            "prepTime": 15
        }))
        .into_domain(now())
        .unwrap();

        assert_eq!(request.title(), "Quarterly planning");
        assert_eq!(request.priority(), Priority::High);
        assert_eq!(request.attendees(), ["ana@example.com".to_string()]);
        assert_eq!(request.preferred_times(), [Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap()]);
        assert_eq!(request.prep_duration(), chrono::Duration::minutes(15));
    }

    #[test]
    fn prep_without_time_means_zero_minutes() {
        let request = dto(serde_json::json!({
            "title": "Sync", "durationMinutes": 30, "requiresPrep": true
        }))
        .into_domain(now())
        .unwrap();
        assert!(request.requires_prep());
        assert_eq!(request.prep_duration(), chrono::Duration::zero());
    }

    #[test]
    fn rejects_unknown_priority() {
        let err = dto(serde_json::json!({ "title": "Sync", "durationMinutes": 30, "priority": "asap" }))
            .into_domain(now())
            .unwrap_err();
        assert!(matches!(&err, SchedulingError::InvalidRequest(m) if m.starts_with("priority")));
    }

    #[test]
    fn rejects_malformed_instants() {
        let err = dto(serde_json::json!({
            "title": "Sync", "durationMinutes": 30, "preferredTimes": ["tomorrow at ten"]
        }))
        .into_domain(now())
        .unwrap_err();
        assert!(matches!(&err, SchedulingError::InvalidRequest(m) if m.starts_with("preferredTimes")));

        let check = CheckConflictsRequest {
            start: "2026-03-02T10:00:00Z".into(),
            end: "10:30".into(),
            exclude_event_id: None,
        };
        assert!(matches!(check.instants(), Err(SchedulingError::InvalidRequest(_))));
    }

    #[test]
    fn domain_validation_still_applies() {
        let err = dto(serde_json::json!({ "title": "Sync", "durationMinutes": 0 }))
            .into_domain(now())
            .unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidRequest(_)));
    }
}
