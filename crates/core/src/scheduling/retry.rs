//! Retry wrapper for calendar provider calls
//!
//! Every provider call goes through [`ProviderRetry::call`]: a per-attempt
//! request timeout, then the generic executor from `slotwise-common` with the
//! classification-driven policy.

use std::future::Future;
use std::time::Duration;

use slotwise_common::policies::ClassifiedRetry;
use slotwise_common::{RetryConfig, RetryError, RetryExecutor, RetryResult};
use slotwise_domain::{RetrySettings, SchedulerConfig, SchedulingError};

use super::ports::ProviderError;

/// Timeout + backoff policy shared by every provider call in the engine.
#[derive(Debug, Clone)]
pub struct ProviderRetry {
    executor: RetryExecutor<ClassifiedRetry>,
    request_timeout: Duration,
}

impl ProviderRetry {
    /// Build from engine configuration.
    ///
    /// # Errors
    /// `SchedulingError::Config` if the retry settings are rejected by the
    /// executor.
    pub fn from_config(config: &SchedulerConfig) -> Result<Self, SchedulingError> {
        let retry_config = retry_config(&config.retry)?;
        Ok(Self {
            executor: RetryExecutor::new(retry_config, ClassifiedRetry),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_attempts(&self) -> u32 {
        self.executor.config().max_attempts
    }

    /// Run `operation` with a timeout per attempt and classified retries.
    ///
    /// An attempt that outlives the request timeout counts as
    /// [`ProviderError::Timeout`] and is retried like any transient failure.
    pub async fn call<T, F, Fut>(
        &self,
        operation_name: &str,
        context: &str,
        mut operation: F,
    ) -> RetryResult<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let limit = self.request_timeout;
        self.executor
            .execute(operation_name, context, || {
                let attempt = operation();
                async move {
                    match tokio::time::timeout(limit, attempt).await {
                        Ok(result) => result,
                        Err(_) => Err(ProviderError::Timeout(format!(
                            "no response within {}ms",
                            limit.as_millis()
                        ))),
                    }
                }
            })
            .await
    }
}

fn retry_config(settings: &RetrySettings) -> Result<RetryConfig, SchedulingError> {
    let builder = RetryConfig::builder()
        .max_attempts(settings.max_attempts)
        .exponential_backoff(
            Duration::from_millis(settings.base_delay_ms),
            settings.multiplier,
            Duration::from_millis(settings.max_delay_ms),
        )
        .unlimited_time();
    let builder = if settings.jitter { builder.equal_jitter() } else { builder.no_jitter() };

    builder.build().map_err(|e| match e {
        RetryError::InvalidConfiguration { message } => SchedulingError::Config(message),
        other => SchedulingError::Config(format!("{other:?}")),
    })
}

/// Translate a failed provider call into the engine's error taxonomy.
///
/// Exhausted transient failures become `ProviderUnavailable`; anything the
/// policy refused to retry is a `PermanentProviderError`.
pub fn provider_failure(error: RetryError<ProviderError>) -> SchedulingError {
    match error {
        RetryError::AttemptsExhausted { attempts, source }
        | RetryError::TimeoutExceeded { attempts, source, .. } => {
            SchedulingError::ProviderUnavailable(format!("{source} (gave up after {attempts} attempts)"))
        }
        RetryError::NonRetryable { source, .. } => {
            SchedulingError::PermanentProviderError(source.to_string())
        }
        RetryError::InvalidConfiguration { message } => SchedulingError::Config(message),
    }
}
