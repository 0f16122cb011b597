//! Engine configuration
//!
//! Every field has a default, so a partial JSON/TOML document is enough to
//! override a single policy knob. Call [`SchedulerConfig::validate`] before
//! handing a config to the engine.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{Result, SchedulingError};
use crate::types::Priority;

/// Top-level configuration for the scheduling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub working_hours: WorkingHours,
    pub slot_granularity_minutes: u32,
    /// Minimum gap kept on both sides of every meeting.
    pub buffer_minutes: u32,
    pub max_results: usize,
    pub default_search_days: u32,
    pub max_search_days: u32,
    pub horizons: SearchHorizons,
    /// Re-attempts with the next candidate after a lost write race.
    pub max_conflict_retries: u32,
    pub max_concurrent_fetches: usize,
    pub request_timeout_ms: u64,
    pub retry: RetrySettings,
    pub scoring: ScoringWeights,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            working_hours: WorkingHours::default(),
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            max_results: DEFAULT_MAX_RESULTS,
            default_search_days: DEFAULT_SEARCH_DAYS,
            max_search_days: MAX_SEARCH_DAYS,
            horizons: SearchHorizons::default(),
            max_conflict_retries: MAX_CONFLICT_RETRIES,
            max_concurrent_fetches: MAX_CONCURRENT_FETCHES,
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            retry: RetrySettings::default(),
            scoring: ScoringWeights::default(),
        }
    }
}

impl SchedulerConfig {
    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns `SchedulingError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.working_hours.validate()?;

        if self.slot_granularity_minutes == 0 {
            return Err(config_error("slot_granularity_minutes must be greater than zero"));
        }
        if self.max_results == 0 {
            return Err(config_error("max_results must be greater than zero"));
        }
        if self.max_search_days == 0 {
            return Err(config_error("max_search_days must be greater than zero"));
        }
        if self.default_search_days == 0 || self.default_search_days > self.max_search_days {
            return Err(config_error(format!(
                "default_search_days must be within 1..={}",
                self.max_search_days
            )));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(config_error("max_concurrent_fetches must be greater than zero"));
        }
        if self.request_timeout_ms == 0 {
            return Err(config_error("request_timeout_ms must be greater than zero"));
        }

        self.retry.validate()?;
        self.scoring.validate()
    }

    /// Clamp a caller-supplied horizon into `1..=max_search_days`.
    pub fn clamp_search_days(&self, days: Option<u32>) -> u32 {
        days.unwrap_or(self.default_search_days).clamp(1, self.max_search_days.max(1))
    }

    /// Search horizon used by the auto-scheduler for a priority.
    pub fn horizon_days(&self, priority: Priority) -> u32 {
        let days = match priority {
            Priority::Urgent => self.horizons.urgent,
            Priority::High => self.horizons.high,
            Priority::Medium => self.horizons.medium,
            Priority::Low => self.horizons.low,
        };
        days.clamp(1, self.max_search_days.max(1))
    }
}

/// Daily window in which candidate slots may be generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHours {
    /// Inclusive start hour, local to `timezone`.
    pub start_hour: u32,
    /// Exclusive end hour; a meeting must finish by this hour.
    pub end_hour: u32,
    /// IANA timezone name, e.g. `Europe/Berlin`.
    pub timezone: String,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_WORK_START_HOUR,
            end_hour: DEFAULT_WORK_END_HOUR,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl WorkingHours {
    /// Parse the configured timezone.
    ///
    /// # Errors
    /// `SchedulingError::Config` for names chrono-tz does not know.
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| config_error(format!("unknown timezone '{}': {e}", self.timezone)))
    }

    fn validate(&self) -> Result<()> {
        if self.end_hour > 24 {
            return Err(config_error("working_hours.end_hour must be at most 24"));
        }
        if self.start_hour >= self.end_hour {
            return Err(config_error(format!(
                "working_hours.start_hour ({}) must be before end_hour ({})",
                self.start_hour, self.end_hour
            )));
        }
        self.tz().map(|_| ())
    }
}

/// Per-priority search horizons, in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHorizons {
    pub urgent: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for SearchHorizons {
    fn default() -> Self {
        Self {
            urgent: URGENT_SEARCH_DAYS,
            high: HIGH_SEARCH_DAYS,
            medium: MEDIUM_SEARCH_DAYS,
            low: LOW_SEARCH_DAYS,
        }
    }
}

/// Backoff settings for provider calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay_ms: RETRY_BASE_DELAY_MS,
            multiplier: RETRY_MULTIPLIER,
            max_delay_ms: RETRY_MAX_DELAY_MS,
            jitter: true,
        }
    }
}

impl RetrySettings {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(config_error("retry.max_attempts must be greater than zero"));
        }
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err(config_error("retry.multiplier must be at least 1.0"));
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(config_error("retry.max_delay_ms must not be below base_delay_ms"));
        }
        Ok(())
    }
}

/// Relative weights of the slot scoring components.
///
/// Weights are normalised by their sum, so only their ratios matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub preference: f64,
    pub priority: f64,
    pub time_of_day: f64,
    pub deadline: f64,
    /// Distance from a preferred time at which its bonus reaches zero.
    pub preference_window_minutes: u32,
    /// Slots ending within this many hours of the deadline lose score.
    pub deadline_pressure_hours: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            preference: 40.0,
            priority: 20.0,
            time_of_day: 25.0,
            deadline: 15.0,
            preference_window_minutes: 45,
            deadline_pressure_hours: 24,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.preference + self.priority + self.time_of_day + self.deadline
    }

    fn validate(&self) -> Result<()> {
        let weights = [self.preference, self.priority, self.time_of_day, self.deadline];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(config_error("scoring weights must be finite and non-negative"));
        }
        if self.total() <= 0.0 {
            return Err(config_error("at least one scoring weight must be positive"));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> SchedulingError {
    SchedulingError::Config(message.into())
}
