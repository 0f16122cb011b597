//! Results produced by the scheduling engine

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::event::ExistingEvent;
use super::interval::TimeInterval;
use crate::errors::FailureReason;

/// A scored, conflict-free proposal for the meeting.
///
/// `interval` covers the meeting itself; prep time is not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCandidate {
    pub interval: TimeInterval,
    /// Score in `[0, 100]`, rounded to one decimal place.
    pub score: f64,
    /// Tags naming the scoring components that contributed.
    pub factors: Vec<String>,
}

impl SlotCandidate {
    pub fn new(interval: TimeInterval, score: f64, factors: Vec<String>) -> Self {
        Self { interval, score, factors }
    }

    /// Result ordering: higher score first, earlier start breaks ties.
    pub fn ranking(a: &Self, b: &Self) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.interval.start().cmp(&b.interval.start()))
    }
}

/// Outcome of checking a proposed interval against the calendar.
///
/// `has_conflict` is derived from `conflicts` at construction and cannot
/// disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    proposed: TimeInterval,
    has_conflict: bool,
    conflicts: Vec<ExistingEvent>,
}

impl ConflictReport {
    pub fn new(proposed: TimeInterval, conflicts: Vec<ExistingEvent>) -> Self {
        Self { proposed, has_conflict: !conflicts.is_empty(), conflicts }
    }

    pub fn proposed(&self) -> TimeInterval {
        self.proposed
    }

    pub fn has_conflict(&self) -> bool {
        self.has_conflict
    }

    pub fn conflicts(&self) -> &[ExistingEvent] {
        &self.conflicts
    }

    pub fn into_conflicts(self) -> Vec<ExistingEvent> {
        self.conflicts
    }
}

/// Final word of an auto-schedule run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SchedulingResult {
    /// The event now exists on the calendar.
    #[serde(rename_all = "camelCase")]
    Committed {
        event: ExistingEvent,
        candidate: SlotCandidate,
        /// Number of candidates tried, including the one that was committed.
        candidates_tried: u32,
    },
    /// Nothing was booked.
    #[serde(rename_all = "camelCase")]
    Failed {
        reason: FailureReason,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        best_candidate: Option<SlotCandidate>,
    },
}

impl SchedulingResult {
    pub fn failed(reason: FailureReason, message: impl Into<String>) -> Self {
        Self::Failed { reason, message: message.into(), best_candidate: None }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// The committed event, if any.
    pub fn event(&self) -> Option<&ExistingEvent> {
        match self {
            Self::Committed { event, .. } => Some(event),
            Self::Failed { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Committed { .. } => None,
            Self::Failed { reason, .. } => Some(*reason),
        }
    }
}
