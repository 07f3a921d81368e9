//! `p4x add`, `p4x edit`, `p4x revert` and `p4x delete`.
//!
//! Each runs a single `p4` operation on the active document and reports
//! the result as one status message.

use anyhow::Result;
use perforce_core::request::{path_arg, resolve_path};
use perforce_core::router::route_text;
use perforce_core::{CommandRequest, Operation};

use super::{FlowOutcome, report, require_file, status};
use crate::context::RuntimeContext;

/// The single-file operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Add,
    Edit,
    Revert,
    Delete,
}

impl FileOp {
    /// The `p4` operation this runs.
    pub fn operation(self) -> Operation {
        match self {
            Self::Add => Operation::Add,
            Self::Edit => Operation::Edit,
            Self::Revert => Operation::Revert,
            Self::Delete => Operation::Delete,
        }
    }

    /// Status message shown on success.
    pub fn done_message(self) -> &'static str {
        match self {
            Self::Add => "Perforce: file opened for add",
            Self::Edit => "Perforce: file opened for edit",
            Self::Revert => "Perforce: file reverted",
            Self::Delete => "Perforce: file marked for delete",
        }
    }
}

/// Execute `op` on the active document.
///
/// Without a workspace root, `p4` runs in the file's own directory so that
/// its P4CONFIG lookup starts there.
pub async fn run(ctx: &RuntimeContext, op: FileOp) -> Result<FlowOutcome> {
    let Some(doc) = require_file(ctx) else {
        return Ok(FlowOutcome::NothingToDo);
    };

    let request = match build_request(ctx, op, &doc.path) {
        Ok(request) => request,
        Err(err) => return Ok(report(ctx, &err)),
    };

    let operation = op.operation();
    match route_text(ctx.dispatcher.run(request).await) {
        Ok(stdout) => {
            ctx.output.append(operation, &stdout);
            status(ctx, op.done_message());
            Ok(FlowOutcome::Completed)
        }
        Err(err) => {
            ctx.output.append(operation, &err.to_string());
            Ok(report(ctx, &err))
        }
    }
}

fn build_request(
    ctx: &RuntimeContext,
    op: FileOp,
    path: &std::path::Path,
) -> perforce_core::Result<CommandRequest> {
    let path = resolve_path(path)?;
    let dir = match ctx.workspace_root {
        Some(_) => None,
        None => path.parent(),
    };
    CommandRequest::new(op.operation())
        .arg(path_arg(&path)?)
        .in_dir(dir)
}
