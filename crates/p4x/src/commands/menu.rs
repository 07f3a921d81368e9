//! `p4x menu` -- choose a Perforce command from a list.

use anyhow::Result;
use perforce_ui::PickItem;

use super::file_ops::FileOp;
use super::{FlowOutcome, diff, file_ops, info, opened};
use crate::context::RuntimeContext;

const PLACEHOLDER: &str = "Choose a Perforce command:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Add,
    Edit,
    Revert,
    Diff,
    DiffRevision,
    Info,
    Opened,
}

const ENTRIES: &[(MenuEntry, &str, &str)] = &[
    (MenuEntry::Add, "add", "Open a new file to add it to the depot"),
    (MenuEntry::Edit, "edit", "Open an existing file for edit"),
    (MenuEntry::Revert, "revert", "Discard changes from an opened file"),
    (MenuEntry::Diff, "diff", "Display diff of client file with depot file"),
    (
        MenuEntry::DiffRevision,
        "diffRevision",
        "Display diff of client file with depot file at a specific revision",
    ),
    (MenuEntry::Info, "info", "Display client/server information"),
    (MenuEntry::Opened, "opened", "View 'open' files and open one in editor"),
];

/// Execute the `p4x menu` command.
pub async fn run(ctx: &RuntimeContext) -> Result<FlowOutcome> {
    let items: Vec<PickItem> = ENTRIES
        .iter()
        .map(|(_, label, description)| PickItem::new(*label, *description))
        .collect();

    let Some(entry) = ctx
        .ui
        .show_selectable_list(&items, Some(PLACEHOLDER))
        .and_then(|idx| ENTRIES.get(idx))
        .map(|(entry, _, _)| *entry)
    else {
        return Ok(FlowOutcome::Cancelled);
    };

    tracing::debug!(?entry, "menu selection");
    match entry {
        MenuEntry::Add => file_ops::run(ctx, FileOp::Add).await,
        MenuEntry::Edit => file_ops::run(ctx, FileOp::Edit).await,
        MenuEntry::Revert => file_ops::run(ctx, FileOp::Revert).await,
        MenuEntry::Diff => diff::run(ctx, None).await,
        MenuEntry::DiffRevision => diff::run_revision(ctx).await,
        MenuEntry::Info => info::run(ctx).await,
        MenuEntry::Opened => opened::run(ctx).await,
    }
}
