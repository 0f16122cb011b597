//! Interval utilities
//!
//! Pure functions over half-open [`TimeInterval`]s. Touching endpoints never
//! overlap, so back-to-back intervals are compatible unless a buffer is
//! applied first.

use chrono::{DateTime, Duration, Utc};
use slotwise_domain::{MeetingRequest, Result, TimeInterval};

/// True iff `a.start < b.end && b.start < a.end`.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start() < b.end() && b.start() < a.end()
}

/// Expand `interval` by `buffer_minutes` on both sides.
pub fn with_buffer(interval: &TimeInterval, buffer_minutes: u32) -> TimeInterval {
    interval.padded(Duration::minutes(i64::from(buffer_minutes)))
}

/// The time a meeting starting at `start` actually occupies, prep included.
pub fn effective_interval(request: &MeetingRequest, start: DateTime<Utc>) -> Result<TimeInterval> {
    let meeting = TimeInterval::from_start(start, request.duration_minutes())?;
    Ok(meeting.extended_before(request.prep_duration()))
}

/// Coalesce overlapping or touching intervals into sorted busy blocks.
pub fn merge_intervals(mut intervals: Vec<TimeInterval>) -> Vec<TimeInterval> {
    intervals.sort();

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some((_, end)) if interval.start() <= *end => {
                if interval.end() > *end {
                    *end = interval.end();
                }
            }
            _ => merged.push((interval.start(), interval.end())),
        }
    }

    merged.into_iter().filter_map(|(start, end)| TimeInterval::new(start, end).ok()).collect()
}

/// Free intervals inside `window` not covered by any of `busy`.
pub fn free_gaps(busy: &[TimeInterval], window: TimeInterval) -> Vec<TimeInterval> {
    let mut gaps = Vec::new();
    let mut cursor = window.start();

    for block in merge_intervals(busy.to_vec()) {
        if block.end() <= cursor {
            continue;
        }
        if block.start() >= window.end() {
            break;
        }
        if block.start() > cursor {
            gaps.extend(TimeInterval::new(cursor, block.start()).ok());
        }
        cursor = cursor.max(block.end());
    }

    if cursor < window.end() {
        gaps.extend(TimeInterval::new(cursor, window.end()).ok());
    }
    gaps
}
