//! Command execution helpers
//!
//! Times every command and logs its outcome so individual commands only
//! contain their own logic.

use std::future::Future;
use std::time::Instant;

use slotwise_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with timing and outcome logging.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext, input: MyInput) -> Result<MyOutput> {
///     execute_command("my_module::my_command", || async {
///         ctx.engine().do_something(input).await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);

    result
}
