//! `p4x where` -- show where a depot file lives in the client workspace.

use anyhow::Result;
use perforce_core::parse::{WhereMapping, depot_path_of};
use perforce_core::router::route_where;
use perforce_core::{CommandRequest, Operation};

use super::{FlowOutcome, report, require_folder};
use crate::cli::WhereArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `p4x where` command.
pub async fn run(ctx: &RuntimeContext, args: &WhereArgs) -> Result<FlowOutcome> {
    if require_folder(ctx).is_none() {
        return Ok(FlowOutcome::NothingToDo);
    }

    let depot_path = depot_path_of(&args.depot_path).unwrap_or(args.depot_path.as_str());
    match where_(ctx, depot_path).await {
        Ok(mapping) => {
            if ctx.json {
                output_json(&mapping);
            } else {
                println!("{}", mapping.local_path);
            }
            Ok(FlowOutcome::Completed)
        }
        Err(err) => Ok(report(ctx, &err)),
    }
}

/// Map `depot_path` (without a revision) to its client and local paths.
pub(crate) async fn where_(
    ctx: &RuntimeContext,
    depot_path: &str,
) -> perforce_core::Result<WhereMapping> {
    let request = CommandRequest::new(Operation::Where).arg(depot_path);
    route_where(ctx.dispatcher.run(request).await)
}
