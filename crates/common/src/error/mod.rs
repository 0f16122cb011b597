//! Error classification primitives shared by every Slotwise crate.
//!
//! Module-specific errors stay as their own `thiserror` enums. What they share
//! is the [`ErrorClassification`] trait, which lets generic infrastructure
//! (most importantly the retry executor in [`crate::resilience`]) decide how to
//! treat an error without knowing its concrete type.
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Resource not found, empty results |
//! | **Warning** | Degraded but operational | Rate limiting, timeouts |
//! | **Error** | Failure requiring attention | Invalid input, auth failures |
//! | **Critical** | System integrity at risk | Internal invariant violations |
//!
//! ```rust,ignore
//! impl ErrorClassification for ProviderError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self.kind, ProviderErrorKind::Timeout | ProviderErrorKind::RateLimited { .. })
//!     }
//!     // ...
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as:
    /// - Network timeouts
    /// - Rate limiting
    /// - Temporary service unavailability (5xx)
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `Some(Duration)` when a specific delay is recommended (e.g.,
    /// from a Retry-After header), or `None` if the caller should fall back
    /// to its own backoff.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
