//! `p4x show-output` -- print the log of p4 output.

use anyhow::{Context, Result};
use perforce_ui::pager;

use super::{FlowOutcome, status};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `p4x show-output` command.
pub fn run(ctx: &RuntimeContext) -> Result<FlowOutcome> {
    let path = ctx.output.path();
    let content = ctx
        .output
        .read()
        .with_context(|| format!("failed to read {}", path.display()))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "path": path,
            "content": content,
        }));
        return Ok(FlowOutcome::Completed);
    }

    if content.is_empty() {
        status(ctx, "Perforce: no output yet");
        return Ok(FlowOutcome::NothingToDo);
    }
    pager::page(&content);
    Ok(FlowOutcome::Completed)
}
