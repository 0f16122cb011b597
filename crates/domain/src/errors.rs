//! Error types used throughout the scheduling engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_domain_status_conversions;

/// Main error type for Slotwise
///
/// `InvalidRequest` and `PermanentProviderError` always reach the caller
/// unmodified. Transient provider failures only appear as
/// `ProviderUnavailable` once the retry executor has given up. An empty
/// search or a lost race is not an error; the auto-scheduler reports those
/// as a [`FailureReason`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SchedulingError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Calendar provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Calendar provider rejected the request: {0}")]
    PermanentProviderError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SchedulingError {
    /// Build an `InvalidRequest` for a named field.
    pub fn invalid_field(field: &str, message: impl std::fmt::Display) -> Self {
        Self::InvalidRequest(format!("{field}: {message}"))
    }
}

/// Result type alias for Slotwise operations
pub type Result<T> = std::result::Result<T, SchedulingError>;

/// Why an auto-schedule attempt ended without a committed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The search window held no conflict-free slot. Not a fault.
    NoAvailability,
    /// Every re-verified candidate lost a race with another booking.
    SchedulingConflict,
    /// The calendar provider kept failing transiently.
    ProviderUnavailable,
}

impl_domain_status_conversions!(FailureReason {
    NoAvailability => "no_availability",
    SchedulingConflict => "scheduling_conflict",
    ProviderUnavailable => "provider_unavailable",
});
