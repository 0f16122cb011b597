//! # Slotwise Domain
//!
//! Business domain types and models for the Slotwise scheduling engine.
//!
//! This crate contains:
//! - Validated value types (TimeInterval, MeetingRequest, SlotCandidate, ...)
//! - Domain error types and Result definitions
//! - Engine configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Slotwise crates
//! - Only external dependencies allowed
//! - Constructors enforce invariants; invalid values never reach the engine

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
