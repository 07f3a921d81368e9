//! Command handlers for the `p4x` CLI.
//!
//! Every handler takes the [`RuntimeContext`] and reports through its
//! [`Ui`](perforce_ui::Ui). Handlers return a [`FlowOutcome`] rather than an
//! error for anything the user should simply be told about; `Err` is kept
//! for failures of p4x itself.

pub mod completion;
pub mod diff;
pub mod file_ops;
pub mod info;
pub mod init;
pub mod menu;
pub mod opened;
pub mod show_output;
pub mod version;
pub mod where_cmd;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::PathBuf;

use anyhow::Result;
use perforce_core::P4Error;
use perforce_ui::ActiveDocument;

use crate::cli::Commands;
use crate::context::RuntimeContext;

/// Shown when a command needs a file and there is no active document.
pub const NO_FILE_SELECTED: &str = "Perforce: No file selected";

/// Shown when a command needs a workspace root and none is known.
pub const NO_FOLDER_SELECTED: &str = "Perforce: No folder selected";

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The command did what it was asked.
    Completed,
    /// The user dismissed a list or prompt.
    Cancelled,
    /// There was nothing to act on.
    NothingToDo,
    /// The command failed and the error was shown to the user.
    Failed,
}

impl FlowOutcome {
    /// Returns `true` if `p4x` should exit non-zero.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Run the handler for `command`.
pub async fn dispatch(ctx: &RuntimeContext, command: &Commands) -> Result<FlowOutcome> {
    match command {
        Commands::Add(_) => file_ops::run(ctx, file_ops::FileOp::Add).await,
        Commands::Edit(_) => file_ops::run(ctx, file_ops::FileOp::Edit).await,
        Commands::Revert(_) => file_ops::run(ctx, file_ops::FileOp::Revert).await,
        Commands::Delete(_) => file_ops::run(ctx, file_ops::FileOp::Delete).await,
        Commands::Diff(args) if args.raw => diff::run_raw(ctx).await,
        Commands::Diff(args) => diff::run(ctx, args.revision).await,
        Commands::DiffRevision(_) => diff::run_revision(ctx).await,
        Commands::Info => info::run(ctx).await,
        Commands::Opened => opened::run(ctx).await,
        Commands::WhereCmd(args) => where_cmd::run(ctx, args).await,
        Commands::Menu(_) => menu::run(ctx).await,
        Commands::ShowOutput => show_output::run(ctx),
        Commands::Init(args) => init::run(ctx, args),
        Commands::Completion(args) => completion::run(ctx, args),
        Commands::Version => version::run(ctx),
    }
}

/// Show a status message for the configured duration.
pub(crate) fn status(ctx: &RuntimeContext, text: &str) {
    ctx.ui.show_status_message(text, ctx.config.status_duration());
}

/// Show `err` to the user.
pub(crate) fn report(ctx: &RuntimeContext, err: &P4Error) -> FlowOutcome {
    tracing::debug!(error = ?err, "command failed");
    ctx.ui.show_error(&err.to_string());
    FlowOutcome::Failed
}

/// The active document, or a status message saying there is none.
pub(crate) fn require_file(ctx: &RuntimeContext) -> Option<ActiveDocument> {
    let doc = ctx.ui.active_document();
    if doc.is_none() {
        status(ctx, NO_FILE_SELECTED);
    }
    doc
}

/// The workspace root, or a status message saying there is none.
pub(crate) fn require_folder(ctx: &RuntimeContext) -> Option<PathBuf> {
    let root = ctx.workspace_root.clone();
    if root.is_none() {
        status(ctx, NO_FOLDER_SELECTED);
    }
    root
}
