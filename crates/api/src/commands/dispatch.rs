//! Name-based command dispatch over JSON payloads

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use slotwise_domain::{Result, SchedulingError};

use super::scheduling::{auto_schedule_meeting, check_conflicts, suggest_meeting_times};
use crate::AppContext;

/// Names accepted by [`dispatch`].
pub const COMMANDS: [&str; 3] = ["suggest", "auto-schedule", "check-conflicts"];

/// Run the command called `name` on a JSON `payload` and return its JSON
/// response.
///
/// # Errors
/// `InvalidRequest` for unknown commands or payloads that do not match the
/// command's request shape; otherwise whatever the command returns.
pub async fn dispatch(ctx: &Arc<AppContext>, name: &str, payload: &str) -> Result<Value> {
    match name {
        "suggest" => to_json(suggest_meeting_times(ctx, parse(payload)?).await?),
        "auto-schedule" => to_json(auto_schedule_meeting(ctx, parse(payload)?).await?),
        "check-conflicts" => to_json(check_conflicts(ctx, parse(payload)?).await?),
        other => Err(SchedulingError::InvalidRequest(format!(
            "unknown command '{other}', expected one of: {}",
            COMMANDS.join(", ")
        ))),
    }
}

fn parse<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload)
        .map_err(|e| SchedulingError::InvalidRequest(format!("malformed request body: {e}")))
}

fn to_json<T: Serialize>(response: T) -> Result<Value> {
    serde_json::to_value(response)
        .map_err(|e| SchedulingError::Internal(format!("failed to encode response: {e}")))
}
