//! Integration tests for the auto-scheduler's check-then-commit cycle

mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Duration;
use slotwise_core::ProviderError;
use slotwise_domain::{
    FailureReason, MeetingRequest, Priority, SchedulingError, SchedulingResult, TimeInterval,
};
use support::calendar::busy;
use support::{engine_at, monday, on_day, MockCalendarProvider};

fn request(now: chrono::DateTime<chrono::Utc>) -> MeetingRequest {
    MeetingRequest::builder("Roadmap review", 30)
        .attendees(["ana@example.com", "li@example.com"])
        .build(now)
        .unwrap()
}

/// The window the conflict detector reads when re-verifying `slot`.
fn verification_window(slot: TimeInterval) -> (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) {
    (slot.start() - Duration::minutes(10), slot.end() + Duration::minutes(10))
}

#[tokio::test]
async fn commits_top_ranked_candidate() {
    let provider = MockCalendarProvider::default().with_busy("standup", monday(9, 0), monday(9, 15));
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);
    let request = request(now);

    let ranked = engine.find_optimal_meeting_times(&request, 14).await.unwrap();
    let result = engine.auto_schedule_meeting(&request).await.unwrap();

    match result {
        SchedulingResult::Committed { event, candidate, candidates_tried } => {
            assert_eq!(candidate, ranked[0]);
            assert_eq!(event.interval, ranked[0].interval);
            assert_eq!(event.title.as_deref(), Some("Roadmap review"));
            assert_eq!(candidates_tried, 1);
        }
        other => panic!("expected commit, got {other:?}"),
    }
    assert_eq!(provider.create_calls(), 1);
    assert!(provider.events().iter().any(|e| e.id == "created-0"));
}

#[tokio::test]
async fn lost_race_falls_back_to_next_candidate() {
    let provider = MockCalendarProvider::default();
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);
    // Two preferred times keep the runner-up away from the contested slot.
    let request = MeetingRequest::builder("Roadmap review", 30)
        .preferred_times([monday(10, 0), monday(14, 0)])
        .build(now)
        .unwrap();

    let ranked = engine.find_optimal_meeting_times(&request, 14).await.unwrap();
    let top = ranked[0].interval;
    assert_eq!(top.start(), monday(10, 0));
    assert_eq!(ranked[1].interval.start(), monday(14, 0));
    let trigger = verification_window(top);
    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    provider.on_list(Box::new(move |start, end| {
        if (start, end) == trigger && !flag.swap(true, Ordering::SeqCst) {
            Some(busy("rival", top.start(), top.end()))
        } else {
            None
        }
    }));

    let result = engine.auto_schedule_meeting(&request).await.unwrap();

    assert!(fired.load(Ordering::SeqCst));
    match result {
        SchedulingResult::Committed { candidate, candidates_tried, .. } => {
            assert_eq!(candidate, ranked[1]);
            assert_eq!(candidates_tried, 2);
        }
        other => panic!("expected fallback commit, got {other:?}"),
    }
    assert_eq!(provider.create_calls(), 1);
}

#[tokio::test]
async fn long_rival_skips_every_neighbour_it_blocks() {
    let provider = MockCalendarProvider::default();
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);
    let request = request(now);

    let ranked = engine.find_optimal_meeting_times(&request, 14).await.unwrap();
    let top = ranked[0].interval;
    assert_eq!(top.start(), monday(10, 0));
    let trigger = verification_window(top);
    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    provider.on_list(Box::new(move |start, end| {
        if (start, end) == trigger && !flag.swap(true, Ordering::SeqCst) {
            Some(busy("rival", monday(10, 0), monday(11, 0)))
        } else {
            None
        }
    }));

    let result = engine.auto_schedule_meeting(&request).await.unwrap();

    assert!(fired.load(Ordering::SeqCst));
    // With a 5 minute buffer on both sides the rival blocks starts up to 11:00.
    let expected = ranked
        .iter()
        .find(|c| c.interval.end() <= monday(9, 50) || c.interval.start() >= monday(11, 10))
        .unwrap();
    match result {
        SchedulingResult::Committed { candidate, candidates_tried, .. } => {
            assert_eq!(&candidate, expected);
            assert_eq!(candidates_tried, 2);
        }
        other => panic!("expected commit past the rival, got {other:?}"),
    }
    assert_eq!(provider.create_calls(), 1);
}

#[tokio::test]
async fn gives_up_after_bounded_conflict_retries() {
    let provider = MockCalendarProvider::default();
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);
    let request = request(now);
    let ranked = engine.find_optimal_meeting_times(&request, 14).await.unwrap();

    // Every re-verification read finds the slot freshly booked.
    let verification_span = Duration::minutes(30 + 20);
    provider.on_list(Box::new(move |start, end| {
        (end - start == verification_span).then(|| {
            busy(
                &format!("rival-{}", start.timestamp()),
                start + Duration::minutes(10),
                end - Duration::minutes(10),
            )
        })
    }));

    let result = engine.auto_schedule_meeting(&request).await.unwrap();

    match result {
        SchedulingResult::Failed { reason, best_candidate, .. } => {
            assert_eq!(reason, FailureReason::SchedulingConflict);
            assert_eq!(best_candidate, Some(ranked[0].clone()));
        }
        other => panic!("expected conflict failure, got {other:?}"),
    }
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn provider_conflict_on_write_counts_as_lost_race() {
    let provider = MockCalendarProvider::default();
    provider.fail_creates(1, ProviderError::Conflict("slot already booked".into()));
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);
    let request = request(now);
    let ranked = engine.find_optimal_meeting_times(&request, 14).await.unwrap();

    let result = engine.auto_schedule_meeting(&request).await.unwrap();

    match result {
        SchedulingResult::Committed { candidate, candidates_tried, .. } => {
            assert_eq!(candidate, ranked[1]);
            assert_eq!(candidates_tried, 2);
        }
        other => panic!("expected commit on second candidate, got {other:?}"),
    }
    assert_eq!(provider.create_calls(), 2);
}

#[tokio::test]
async fn urgent_requests_search_a_short_horizon() {
    let provider = MockCalendarProvider::default().with_busy("offsite", monday(0, 0), on_day(4, 0, 0));
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);

    let urgent = MeetingRequest::builder("Incident review", 30)
        .priority(Priority::Urgent)
        .build(now)
        .unwrap();
    let result = engine.auto_schedule_meeting(&urgent).await.unwrap();
    assert_eq!(result.failure_reason(), Some(FailureReason::NoAvailability));
    assert_eq!(provider.create_calls(), 0);

    let medium = MeetingRequest::builder("Retro", 30).build(now).unwrap();
    let result = engine.auto_schedule_meeting(&medium).await.unwrap();
    let event = result.event().expect("medium priority searches past the offsite");
    assert!(event.interval.start() >= on_day(4, 9, 0));
}

#[tokio::test]
async fn exhausted_write_retries_report_provider_unavailable_with_best_candidate() {
    let provider = MockCalendarProvider::default();
    provider.fail_creates(3, ProviderError::ServerError { status: 502, message: "bad gateway".into() });
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);
    let request = request(now);
    let ranked = engine.find_optimal_meeting_times(&request, 14).await.unwrap();

    let result = engine.auto_schedule_meeting(&request).await.unwrap();

    match result {
        SchedulingResult::Failed { reason, message, best_candidate } => {
            assert_eq!(reason, FailureReason::ProviderUnavailable);
            assert!(!message.is_empty());
            assert_eq!(best_candidate, Some(ranked[0].clone()));
        }
        other => panic!("expected provider failure, got {other:?}"),
    }
    assert_eq!(provider.create_calls(), 3);
}

#[tokio::test]
async fn search_outage_fails_without_candidate() {
    let provider = MockCalendarProvider::default();
    provider.fail_lists(100, ProviderError::Network("connection reset".into()));
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);

    let result = engine.auto_schedule_meeting(&request(now)).await.unwrap();

    match result {
        SchedulingResult::Failed { reason, best_candidate, .. } => {
            assert_eq!(reason, FailureReason::ProviderUnavailable);
            assert!(best_candidate.is_none());
        }
        other => panic!("expected provider failure, got {other:?}"),
    }
}

#[tokio::test]
async fn permanent_write_errors_propagate() {
    let provider = MockCalendarProvider::default();
    provider.fail_creates(1, ProviderError::Unauthorized("calendar scope revoked".into()));
    let now = monday(8, 0);
    let engine = engine_at(&provider, now);

    let result = engine.auto_schedule_meeting(&request(now)).await;

    assert!(matches!(result, Err(SchedulingError::PermanentProviderError(_))));
    assert_eq!(provider.create_calls(), 1);
}
