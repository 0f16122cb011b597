//! Resilience patterns for fault tolerance
//!
//! This module provides a **generic, reusable** retry executor:
//! - Generic over error types
//! - Exponential or fixed backoff with optional jitter
//! - Pluggable retry policies (classification-driven or predicate-driven)
//! - Every attempt is traced with the caller's operation name and context
//!
//! Domain crates wrap it with their own error mapping; the executor itself
//! never interprets the errors it sees beyond asking the policy.

pub mod retry;

// Re-export retry types
pub use retry::{
    policies, BackoffStrategy, Jitter, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError,
    RetryExecutor, RetryOutcome, RetryPolicy, RetryResult,
};
