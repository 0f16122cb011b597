//! Calendar scheduling engine
//!
//! Leaves first: interval utilities, conflict detection, availability search
//! with scoring, and the auto-scheduler that commits through the provider.
//! Every provider call runs through [`retry::ProviderRetry`].

pub mod auto_scheduler;
pub mod availability;
pub mod conflict;
pub mod interval;
pub mod ports;
pub mod retry;
pub mod scoring;
pub mod service;

pub use auto_scheduler::AutoScheduler;
pub use availability::AvailabilitySearch;
pub use conflict::{find_conflicts, ConflictDetector};
pub use interval::{effective_interval, free_gaps, merge_intervals, overlaps, with_buffer};
pub use ports::{CalendarDataProvider, Clock, FixedClock, ProviderError, SystemClock};
pub use retry::{provider_failure, ProviderRetry};
pub use scoring::SlotScorer;
pub use service::SchedulingService;
