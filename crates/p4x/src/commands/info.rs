//! `p4x info` -- display client/server information.

use anyhow::Result;
use perforce_core::router::route_text;
use perforce_core::{CommandRequest, Operation};

use super::{FlowOutcome, report, require_folder};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `p4x info` command.
pub async fn run(ctx: &RuntimeContext) -> Result<FlowOutcome> {
    if require_folder(ctx).is_none() {
        return Ok(FlowOutcome::NothingToDo);
    }

    let result = ctx.dispatcher.run(CommandRequest::new(Operation::Info)).await;
    match route_text(result) {
        Ok(stdout) => {
            ctx.output.append(Operation::Info, &stdout);
            if ctx.json {
                output_json(&serde_json::json!({ "info": stdout.trim_end() }));
            } else {
                print!("{stdout}");
            }
            Ok(FlowOutcome::Completed)
        }
        Err(err) => Ok(report(ctx, &err)),
    }
}
