//! `p4x opened` -- pick one of the opened files and open it in the editor.
//!
//! The flow runs in three stages: list the opened files and let the user
//! pick one, resolve its depot path to a local path with `p4 where`, then
//! hand that path to the editor. Each stage only runs if the previous one
//! produced something.

use std::path::PathBuf;

use anyhow::Result;
use perforce_core::parse::{OpenedFileRecord, depot_path_of};
use perforce_core::router::route_opened;
use perforce_core::{CommandRequest, Operation, P4Error};
use perforce_ui::PickItem;
use tracing::debug;

use super::where_cmd::where_;
use super::{FlowOutcome, report, require_folder};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `p4x opened` command.
pub async fn run(ctx: &RuntimeContext) -> Result<FlowOutcome> {
    if require_folder(ctx).is_none() {
        return Ok(FlowOutcome::NothingToDo);
    }

    let outcome = match select_and_open(ctx).await {
        Ok(outcome) => outcome,
        Err(err) if err.is_parse() => {
            debug!(error = %err, "nothing to open");
            FlowOutcome::NothingToDo
        }
        Err(err) => report(ctx, &err),
    };
    Ok(outcome)
}

async fn select_and_open(ctx: &RuntimeContext) -> perforce_core::Result<FlowOutcome> {
    let records = list_files(ctx).await?;
    if ctx.json {
        output_json(&records);
        return Ok(FlowOutcome::Completed);
    }
    if records.is_empty() {
        return Ok(FlowOutcome::NothingToDo);
    }

    let Some(record) = pick_file(ctx, &records) else {
        return Ok(FlowOutcome::Cancelled);
    };
    let local_path = resolve_local_path(ctx, record).await?;
    Ok(open_document(ctx, local_path))
}

async fn list_files(ctx: &RuntimeContext) -> perforce_core::Result<Vec<OpenedFileRecord>> {
    let result = ctx.dispatcher.run(CommandRequest::new(Operation::Opened)).await;
    route_opened(result)
}

fn pick_file<'a>(
    ctx: &RuntimeContext,
    records: &'a [OpenedFileRecord],
) -> Option<&'a OpenedFileRecord> {
    let items: Vec<PickItem> = records
        .iter()
        .map(|record| PickItem::new(&record.label, &record.description))
        .collect();
    ctx.ui
        .show_selectable_list(&items, None)
        .and_then(|idx| records.get(idx))
}

async fn resolve_local_path(
    ctx: &RuntimeContext,
    record: &OpenedFileRecord,
) -> perforce_core::Result<PathBuf> {
    let depot_path = depot_path_of(&record.description).ok_or_else(|| {
        P4Error::Parse(format!("no revision marker in '{}'", record.description))
    })?;
    let mapping = where_(ctx, depot_path).await?;
    Ok(PathBuf::from(mapping.local_path))
}

fn open_document(ctx: &RuntimeContext, path: PathBuf) -> FlowOutcome {
    match ctx.ui.open_document(&path) {
        Ok(()) => FlowOutcome::Completed,
        Err(err) => {
            ctx.ui.show_error(&err.to_string());
            FlowOutcome::Failed
        }
    }
}
