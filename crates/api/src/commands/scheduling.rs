//! Scheduling commands
//!
//! One command per engine operation. Every command converts its request,
//! runs the engine and logs the outcome through
//! [`execute_command`](crate::utils::command_helpers::execute_command).

use std::sync::Arc;

use slotwise_domain::{ConflictReport, Result, SchedulingResult};
use tracing::info;

use super::requests::{AutoScheduleRequest, CheckConflictsRequest, SuggestRequest, SuggestResponse};
use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// Rank conflict-free slots for a meeting.
pub async fn suggest_meeting_times(
    ctx: &Arc<AppContext>,
    input: SuggestRequest,
) -> Result<SuggestResponse> {
    execute_command("scheduling::suggest_meeting_times", || async move {
        let engine = ctx.engine();
        let request = input.request.into_domain(engine.now())?;
        let search_days = ctx.config().clamp_search_days(input.search_days);

        info!(title = request.title(), search_days, "Suggesting meeting times");
        let candidates = engine.find_optimal_meeting_times(&request, search_days).await?;
        Ok(SuggestResponse::from(candidates))
    })
    .await
}

/// Find and book the best slot for a meeting.
///
/// Expected failures (no availability, lost races, provider outage) are a
/// successful command returning [`SchedulingResult::Failed`].
pub async fn auto_schedule_meeting(
    ctx: &Arc<AppContext>,
    input: AutoScheduleRequest,
) -> Result<SchedulingResult> {
    execute_command("scheduling::auto_schedule_meeting", || async move {
        let engine = ctx.engine();
        let request = input.request.into_domain(engine.now())?;

        info!(title = request.title(), priority = %request.priority(), "Auto-scheduling meeting");
        engine.auto_schedule_meeting(&request).await
    })
    .await
}

/// Report the events that collide with a proposed interval.
pub async fn check_conflicts(
    ctx: &Arc<AppContext>,
    input: CheckConflictsRequest,
) -> Result<ConflictReport> {
    execute_command("scheduling::check_conflicts", || async move {
        let (start, end) = input.instants()?;
        ctx.engine().detect_conflicts(start, end, input.exclude_event_id.as_deref()).await
    })
    .await
}
