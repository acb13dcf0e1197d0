//! Store maintenance commands

use petnco_domain::{Actor, PetncoError, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Store-wide expiry sweep at the context clock's "now"; staff only
pub async fn sweep_expired(ctx: &AppContext, actor: &Actor) -> Result<u64> {
    execute_command("maintenance::sweep", || async {
        if !actor.is_staff {
            return Err(PetncoError::Forbidden("only staff can run maintenance".to_string()));
        }
        ctx.sweeper.sweep(ctx.clock.now()).await
    })
    .await
}
