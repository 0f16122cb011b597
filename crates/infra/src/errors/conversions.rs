//! Conversions from HTTP transport errors and status codes into
//! [`ProviderError`].
//!
//! The engine only retries errors classified as transient, so this table
//! decides which provider failures are worth another attempt.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Error as HttpError, StatusCode};
use slotwise_core::ProviderError;

/// Longest body excerpt carried into an error message.
const MAX_BODY_EXCERPT: usize = 256;

/// Map a non-success HTTP response onto a provider error.
///
/// | Status | Error |
/// |--------|-------|
/// | 408 | `Timeout` |
/// | 429 | `RateLimited` (with `Retry-After`) |
/// | 5xx | `ServerError` |
/// | 400, 422 | `Validation` |
/// | 401, 403 | `Unauthorized` |
/// | 404, 410 | `NotFound` |
/// | 409 | `Conflict` |
pub fn classify_status(status: StatusCode, headers: &HeaderMap, body: &str) -> ProviderError {
    let message = format!("HTTP {}: {}", status.as_u16(), excerpt(body));

    match status {
        StatusCode::REQUEST_TIMEOUT => ProviderError::Timeout(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            message,
            retry_after: parse_retry_after(headers, Utc::now()),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::Validation(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized(message),
        StatusCode::NOT_FOUND | StatusCode::GONE => ProviderError::NotFound(message),
        StatusCode::CONFLICT => ProviderError::Conflict(message),
        s if s.is_server_error() => {
            ProviderError::ServerError { status: s.as_u16(), message: excerpt(body) }
        }
        _ => ProviderError::Validation(message),
    }
}

/// Map a transport-level failure (no usable response) onto a provider error.
pub fn classify_transport(err: HttpError) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else if err.is_decode() {
        ProviderError::Validation(format!("malformed provider response: {err}"))
    } else if err.is_builder() {
        ProviderError::Validation(format!("invalid provider request: {err}"))
    } else if let Some(status) = err.status() {
        classify_status(status, &HeaderMap::new(), &err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Read `Retry-After` as delta-seconds or an HTTP date.
///
/// Dates in the past yield a zero delay.
pub fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    Some((at - now).to_std().unwrap_or(Duration::ZERO))
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
