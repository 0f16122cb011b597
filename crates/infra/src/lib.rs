//! # Slotwise Infrastructure
//!
//! Implementations of the engine's ports and the process-level plumbing.
//!
//! This crate contains:
//! - Configuration loading (environment variables, JSON/TOML files)
//! - Tracing subscriber setup
//! - Calendar providers (in-memory, Google Calendar REST API)
//!
//! ## Architecture
//! - Implements traits defined in `slotwise-core`
//! - Contains all "impure" code (I/O, network, environment)

pub mod config;
pub mod errors;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use errors::{classify_status, classify_transport};
pub use integrations::calendar::{GoogleCalendarConfig, GoogleCalendarProvider, InMemoryCalendarProvider};
pub use observability::{init_tracing, LogFormat};
