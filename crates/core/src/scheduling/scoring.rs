//! Slot scoring
//!
//! A candidate's score is the weighted mean of four components, each in
//! `[0, 1]`, scaled to `[0, 100]` and rounded to one decimal:
//!
//! | Component | 1.0 when | 0.0 when |
//! |-----------|----------|----------|
//! | preference | start equals a preferred time | further than the preference window |
//! | priority | earliest surviving slot, urgent request | latest slot, urgent request |
//! | time of day | mid-morning | early morning or evening |
//! | deadline | no deadline or comfortably before it | ends at the deadline |
//!
//! Requests without preferred times get a neutral 0.5 preference so the
//! other components still rank them.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use slotwise_domain::constants::{
    FACTOR_DEADLINE_PRESSURE, FACTOR_OFF_PEAK_HOURS, FACTOR_PEAK_HOURS, FACTOR_PREFERRED_EXACT,
    FACTOR_PREFERRED_NEAR, FACTOR_PREP_BLOCK, FACTOR_PRIORITY_EARLY, FACTOR_URGENT_EARLIEST,
    FACTOR_WEEKEND,
};
use slotwise_domain::{MeetingRequest, Priority, ScoringWeights, TimeInterval};

const NEUTRAL: f64 = 0.5;

/// Scores candidates for one request.
///
/// `earliest` and `latest` are the first and last surviving candidate starts;
/// the priority component ranks a slot by where it falls between them.
pub struct SlotScorer<'a> {
    weights: &'a ScoringWeights,
    tz: Tz,
    request: &'a MeetingRequest,
    earliest: DateTime<Utc>,
    latest: DateTime<Utc>,
}

impl<'a> SlotScorer<'a> {
    pub fn new(
        weights: &'a ScoringWeights,
        tz: Tz,
        request: &'a MeetingRequest,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> Self {
        Self { weights, tz, request, earliest, latest }
    }

    /// Score `slot` (the meeting itself, prep excluded) and list the factor
    /// tags that contributed.
    pub fn score(&self, slot: &TimeInterval) -> (f64, Vec<String>) {
        let mut factors = Vec::new();

        let preference = self.preference(slot.start(), &mut factors);
        let priority = self.priority(slot.start(), &mut factors);
        let time_of_day = self.time_of_day(slot.start(), &mut factors);
        let deadline = self.deadline(slot.end(), &mut factors);
        if self.request.requires_prep() {
            factors.push(FACTOR_PREP_BLOCK.to_string());
        }

        let w = self.weights;
        let total = w.total();
        if total <= 0.0 {
            return (0.0, factors);
        }
        let weighted = w.preference * preference
            + w.priority * priority
            + w.time_of_day * time_of_day
            + w.deadline * deadline;

        (round_one_decimal(100.0 * weighted / total), factors)
    }

    fn preference(&self, start: DateTime<Utc>, factors: &mut Vec<String>) -> f64 {
        let preferred = self.request.preferred_times();
        if preferred.is_empty() {
            return NEUTRAL;
        }

        let window = f64::from(self.weights.preference_window_minutes);
        let best = preferred
            .iter()
            .map(|p| {
                let distance = (start - *p).num_seconds().abs() as f64 / 60.0;
                if distance == 0.0 {
                    1.0
                } else if window <= 0.0 {
                    0.0
                } else {
                    (1.0 - distance / window).max(0.0)
                }
            })
            .fold(0.0_f64, f64::max);

        if best >= 1.0 {
            factors.push(FACTOR_PREFERRED_EXACT.to_string());
        } else if best > 0.0 {
            factors.push(FACTOR_PREFERRED_NEAR.to_string());
        }
        best
    }

    fn priority(&self, start: DateTime<Utc>, factors: &mut Vec<String>) -> f64 {
        let urgency = match self.request.priority() {
            Priority::Urgent => 1.0,
            Priority::High => 0.6,
            Priority::Medium => 0.3,
            Priority::Low => 0.0,
        };

        let span = (self.latest - self.earliest).num_seconds();
        let earliness = if span <= 0 {
            1.0
        } else {
            let offset = (start - self.earliest).num_seconds().clamp(0, span);
            1.0 - offset as f64 / span as f64
        };

        if self.request.priority() == Priority::Urgent && start == self.earliest {
            factors.push(FACTOR_URGENT_EARLIEST.to_string());
        } else if urgency > 0.0 && earliness >= 0.75 {
            factors.push(FACTOR_PRIORITY_EARLY.to_string());
        }

        urgency * earliness + (1.0 - urgency) * NEUTRAL
    }

    fn time_of_day(&self, start: DateTime<Utc>, factors: &mut Vec<String>) -> f64 {
        let local = start.with_timezone(&self.tz);
        let minute_of_day = local.hour() * 60 + local.minute();

        let mut desirability = match minute_of_day {
            m if (600..720).contains(&m) => 1.0,
            m if (780..900).contains(&m) => 0.9,
            m if (540..600).contains(&m) => 0.7,
            m if (900..1020).contains(&m) => 0.6,
            m if (720..780).contains(&m) => 0.5,
            _ => 0.2,
        };

        if desirability >= 0.9 {
            factors.push(FACTOR_PEAK_HOURS.to_string());
        } else if desirability <= 0.2 {
            factors.push(FACTOR_OFF_PEAK_HOURS.to_string());
        }

        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            desirability *= 0.5;
            factors.push(FACTOR_WEEKEND.to_string());
        }
        desirability
    }

    fn deadline(&self, end: DateTime<Utc>, factors: &mut Vec<String>) -> f64 {
        let Some(deadline) = self.request.deadline() else {
            return 1.0;
        };
        let pressure_minutes = f64::from(self.weights.deadline_pressure_hours) * 60.0;
        if pressure_minutes <= 0.0 {
            return 1.0;
        }

        let slack = (deadline - end).num_minutes() as f64;
        if slack >= pressure_minutes {
            return 1.0;
        }
        factors.push(FACTOR_DEADLINE_PRESSURE.to_string());
        (slack / pressure_minutes).clamp(0.0, 1.0)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
