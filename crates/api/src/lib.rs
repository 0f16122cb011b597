//! # Slotwise API
//!
//! Application layer - commands and the `slotwise` entry point.
//!
//! This crate contains:
//! - Commands for the three engine operations (suggest, auto-schedule,
//!   check-conflicts) over loosely typed request DTOs
//! - Application context (dependency injection)
//! - Command logging helpers
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
