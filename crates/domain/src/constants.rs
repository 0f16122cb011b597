//! Application constants
//!
//! Centralized location for the scheduling defaults. Every value here can be
//! overridden through [`crate::config::SchedulerConfig`].

// Working day
pub const DEFAULT_WORK_START_HOUR: u32 = 9;
pub const DEFAULT_WORK_END_HOUR: u32 = 18;
pub const DEFAULT_TIMEZONE: &str = "UTC";

// Candidate generation
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u32 = 15;
pub const DEFAULT_BUFFER_MINUTES: u32 = 5;
pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const DEFAULT_SEARCH_DAYS: u32 = 14;
pub const MAX_SEARCH_DAYS: u32 = 60;

// Search horizons by priority (days)
pub const URGENT_SEARCH_DAYS: u32 = 2;
pub const HIGH_SEARCH_DAYS: u32 = 7;
pub const MEDIUM_SEARCH_DAYS: u32 = 14;
pub const LOW_SEARCH_DAYS: u32 = 14;

// Auto-scheduling
pub const MAX_CONFLICT_RETRIES: u32 = 3;
pub const MAX_CONCURRENT_FETCHES: usize = 4;
pub const REQUEST_TIMEOUT_MS: u64 = 10_000;

// Retry executor
pub const RETRY_MAX_ATTEMPTS: u32 = 3;
pub const RETRY_BASE_DELAY_MS: u64 = 200;
pub const RETRY_MULTIPLIER: f64 = 2.0;
pub const RETRY_MAX_DELAY_MS: u64 = 5_000;

// Request limits
pub const MAX_MEETING_DURATION_MINUTES: u32 = 24 * 60;
pub const MAX_PREP_TIME_MINUTES: u32 = 8 * 60;

// Explainability tags attached to slot candidates
pub const FACTOR_PREFERRED_EXACT: &str = "preferred_time_exact";
pub const FACTOR_PREFERRED_NEAR: &str = "preferred_time_near";
pub const FACTOR_URGENT_EARLIEST: &str = "urgent_earliest";
pub const FACTOR_PRIORITY_EARLY: &str = "priority_early";
pub const FACTOR_PEAK_HOURS: &str = "peak_hours";
pub const FACTOR_OFF_PEAK_HOURS: &str = "off_peak_hours";
pub const FACTOR_DEADLINE_PRESSURE: &str = "deadline_pressure";
pub const FACTOR_WEEKEND: &str = "weekend";
pub const FACTOR_PREP_BLOCK: &str = "prep_block";
