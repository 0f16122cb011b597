//! Half-open time interval `[start, end)`

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchedulingError};

/// A span of time with `end > start`.
///
/// Endpoints are private so the invariant holds for every value in the
/// system; deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", rename_all = "camelCase")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = SchedulingError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Create an interval, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(SchedulingError::InvalidRequest(format!(
                "interval end ({}) must be after start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Create an interval of `minutes` starting at `start`.
    pub fn from_start(start: DateTime<Utc>, minutes: u32) -> Result<Self> {
        Self::new(start, start + Duration::minutes(i64::from(minutes)))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether `other` lies entirely within this interval.
    pub fn encloses(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Widen both ends by `padding`. A non-positive padding returns `self`.
    pub fn padded(&self, padding: Duration) -> Self {
        if padding <= Duration::zero() {
            return *self;
        }
        Self { start: self.start - padding, end: self.end + padding }
    }

    /// Move the start earlier by `lead`, keeping the end.
    pub fn extended_before(&self, lead: Duration) -> Self {
        if lead <= Duration::zero() {
            return *self;
        }
        Self { start: self.start - lead, end: self.end }
    }
}
