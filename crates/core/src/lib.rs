//! # Slotwise Core
//!
//! The calendar scheduling engine - no infrastructure dependencies.
//!
//! This crate contains:
//! - Interval algebra and conflict detection
//! - Availability search and slot scoring
//! - The auto-scheduler's check-then-commit state machine
//! - Port interfaces (traits) for the calendar provider and the clock
//!
//! ## Architecture Principles
//! - Depends only on `slotwise-common` and `slotwise-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod scheduling;

pub use scheduling::{
    effective_interval, find_conflicts, free_gaps, merge_intervals, overlaps, with_buffer,
    AutoScheduler, AvailabilitySearch, CalendarDataProvider, Clock, ConflictDetector, FixedClock,
    ProviderError, ProviderRetry, SchedulingService, SystemClock,
};
