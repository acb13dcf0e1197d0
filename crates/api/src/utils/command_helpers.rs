//! Command execution helpers
//!
//! Every command goes through [`execute_command`] so timing and outcome
//! logging look the same across the API.

use std::future::Future;
use std::time::Instant;

use petnco_domain::Result as DomainResult;

use crate::utils::logging::log_command_execution;

/// Run `command_fn`, then log its duration and outcome under `command_name`
///
/// # Example
///
/// ```rust,ignore
/// execute_command("slots::withdraw", || async {
///     ctx.slots.withdraw(slot_id, &actor).await
/// })
/// .await
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;
    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}
