use std::time::Duration;

use slotwise_domain::SchedulingError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` should be a stable identifier such as `"scheduling::suggest"`;
/// callers must avoid forwarding request contents in it.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    success: bool,
    error_type: Option<&str>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, success, "command_execution_success");
    } else {
        warn!(command, duration_ms, success, error_type, "command_execution_failure");
    }
}

/// Convert a `SchedulingError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SchedulingError) -> &'static str {
    match error {
        SchedulingError::InvalidRequest(_) => "invalid_request",
        SchedulingError::ProviderUnavailable(_) => "provider_unavailable",
        SchedulingError::PermanentProviderError(_) => "permanent_provider_error",
        SchedulingError::Config(_) => "config",
        SchedulingError::Internal(_) => "internal",
    }
}
