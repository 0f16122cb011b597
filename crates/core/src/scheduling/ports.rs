//! Port interfaces for the scheduling engine
//!
//! The calendar of record lives outside the process. These traits define the
//! narrow contract the engine needs from it, plus the clock used for every
//! "now" comparison.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_common::{ErrorClassification, ErrorSeverity};
use slotwise_domain::{EventMetadata, ExistingEvent, TimeInterval};
use thiserror::Error;

/// Source of truth for existing events and sink for new bookings.
#[async_trait]
pub trait CalendarDataProvider: Send + Sync {
    /// Events intersecting `[window_start, window_end)`.
    async fn list_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<ExistingEvent>, ProviderError>;

    /// Book `interval` and return the event as stored by the provider.
    async fn create_event(
        &self,
        interval: TimeInterval,
        metadata: &EventMetadata,
    ) -> Result<ExistingEvent, ProviderError>;
}

/// Failure reported by a calendar provider.
///
/// The first four variants are transient and retried by the engine; the rest
/// are permanent and surface immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider request timed out: {0}")]
    Timeout(String),

    #[error("provider rate limit reached: {message}")]
    RateLimited { message: String, retry_after: Option<Duration> },

    #[error("provider server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("network error talking to provider: {0}")]
    Network(String),

    #[error("provider rejected the request: {0}")]
    Validation(String),

    #[error("provider denied access: {0}")]
    Unauthorized(String),

    #[error("provider resource not found: {0}")]
    NotFound(String),

    /// The slot was taken between our check and the write.
    #[error("provider reported a conflicting booking: {0}")]
    Conflict(String),
}

impl ProviderError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl ErrorClassification for ProviderError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::RateLimited { .. } | Self::ServerError { .. } | Self::Network(_)
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Timeout(_) | Self::RateLimited { .. } | Self::Network(_) => ErrorSeverity::Warning,
            Self::NotFound(_) | Self::Conflict(_) => ErrorSeverity::Info,
            Self::ServerError { .. } | Self::Validation(_) => ErrorSeverity::Error,
            Self::Unauthorized(_) => ErrorSeverity::Critical,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Time source for deadline checks and search windows.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ProviderError::Timeout("slow".into()).is_retryable());
        assert!(ProviderError::Network("reset".into()).is_retryable());
        assert!(ProviderError::ServerError { status: 503, message: "down".into() }.is_retryable());
        assert!(ProviderError::RateLimited { message: "slow down".into(), retry_after: None }
            .is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        for error in [
            ProviderError::Validation("bad".into()),
            ProviderError::Unauthorized("expired".into()),
            ProviderError::NotFound("calendar".into()),
            ProviderError::Conflict("taken".into()),
        ] {
            assert!(!error.is_retryable(), "{error} should be permanent");
        }
        assert!(ProviderError::Unauthorized("expired".into()).is_critical());
    }

    #[test]
    fn retry_after_comes_from_rate_limit_hint() {
        let error = ProviderError::RateLimited {
            message: "quota".into(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(error.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(ProviderError::Timeout("slow".into()).retry_after(), None);
    }

    #[test]
    fn fixed_clock_never_moves() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }
}
