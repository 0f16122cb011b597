//! Error mapping for infrastructure adapters

pub mod conversions;

pub use conversions::{classify_status, classify_transport, parse_retry_after};
