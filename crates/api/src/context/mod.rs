//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use slotwise_core::{CalendarDataProvider, Clock, SchedulingService, SystemClock};
use slotwise_domain::{Result, SchedulerConfig};
use slotwise_infra::{GoogleCalendarConfig, GoogleCalendarProvider, InMemoryCalendarProvider};
use tracing::{info, warn};

/// Access token for the Google Calendar API. When unset the context runs
/// against an empty in-memory calendar.
pub const ENV_GOOGLE_ACCESS_TOKEN: &str = "SLOTWISE_GOOGLE_ACCESS_TOKEN";
pub const ENV_GOOGLE_CALENDAR_ID: &str = "SLOTWISE_GOOGLE_CALENDAR_ID";
pub const ENV_GOOGLE_BASE_URL: &str = "SLOTWISE_GOOGLE_BASE_URL";

const DEFAULT_CALENDAR_ID: &str = "primary";

/// Application context - holds the engine and its configuration
pub struct AppContext {
    engine: SchedulingService,
}

impl AppContext {
    /// Build the context from the environment.
    ///
    /// Configuration comes from [`slotwise_infra::config::load`]; the
    /// calendar provider is Google when an access token is configured.
    ///
    /// # Errors
    /// `SchedulingError::Config` if configuration or provider setup fails.
    pub fn new() -> Result<Self> {
        let config = slotwise_infra::config::load()?;
        let provider = provider_from_env(&config)?;
        Self::with_provider(config, provider, Arc::new(SystemClock))
    }

    /// Build the context around an explicit provider and clock.
    pub fn with_provider(
        config: SchedulerConfig,
        provider: Arc<dyn CalendarDataProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let engine = SchedulingService::new(provider, clock, config)?;
        info!(
            timezone = %engine.config().working_hours.timezone,
            buffer_minutes = engine.config().buffer_minutes,
            "scheduling engine ready"
        );
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &SchedulingService {
        &self.engine
    }

    pub fn config(&self) -> &SchedulerConfig {
        self.engine.config()
    }
}

fn provider_from_env(config: &SchedulerConfig) -> Result<Arc<dyn CalendarDataProvider>> {
    let Ok(token) = std::env::var(ENV_GOOGLE_ACCESS_TOKEN) else {
        warn!("{ENV_GOOGLE_ACCESS_TOKEN} not set, using an empty in-memory calendar");
        return Ok(Arc::new(InMemoryCalendarProvider::new()));
    };

    let calendar_id =
        std::env::var(ENV_GOOGLE_CALENDAR_ID).unwrap_or_else(|_| DEFAULT_CALENDAR_ID.to_string());
    let mut google = GoogleCalendarConfig::new(calendar_id, token)
        .with_request_timeout(Duration::from_millis(config.request_timeout_ms));
    if let Ok(base_url) = std::env::var(ENV_GOOGLE_BASE_URL) {
        google = google.with_base_url(base_url);
    }

    let provider = GoogleCalendarProvider::new(google)?;
    info!(calendar_id = provider.calendar_id(), "using Google Calendar provider");
    Ok(Arc::new(provider))
}
