//! Calendar providers
//!
//! Implementations of [`CalendarDataProvider`](slotwise_core::CalendarDataProvider):
//! - [`InMemoryCalendarProvider`] for local runs and tests
//! - [`GoogleCalendarProvider`] for the Google Calendar REST API (v3)

pub mod providers;

pub use providers::google::{GoogleCalendarConfig, GoogleCalendarProvider};
pub use providers::memory::InMemoryCalendarProvider;
