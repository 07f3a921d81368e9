//! `p4x diff` and `p4x diff-revision` -- compare the active document with
//! a depot revision.
//!
//! The depot copy is fetched with `p4 print -q`, written to a temporary
//! file and handed to the UI's diff view next to the document on disk.
//! `--raw` skips all that and shows `p4 diff` output instead.

use std::io::Write;

use anyhow::{Context, Result};
use perforce_core::parse::{diff_title, file_spec, parse_revision};
use perforce_core::request::{path_arg, resolve_path};
use perforce_core::router::{route, route_text};
use perforce_core::{CommandRequest, Operation};
use perforce_ui::pager;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{FlowOutcome, report, require_file, require_folder, status};
use crate::context::RuntimeContext;

/// Prompt for `p4x diff-revision`.
pub const REVISION_PROMPT: &str = "What revision would you like to diff?";

/// Shown when the document has unsaved edits.
pub const COMPARING_SAVED_COPY: &str = "Perforce: unsaved changes are not included in the diff";

/// Diff the active document against `revision`, or the most recent
/// revision when `None`.
pub async fn run(ctx: &RuntimeContext, revision: Option<u32>) -> Result<FlowOutcome> {
    let Some(doc) = require_file(ctx) else {
        return Ok(FlowOutcome::NothingToDo);
    };
    if require_folder(ctx).is_none() {
        return Ok(FlowOutcome::NothingToDo);
    }
    if doc.untitled {
        debug!(path = %doc.path.display(), "untitled document has no depot copy");
        return Ok(FlowOutcome::NothingToDo);
    }

    let path = match resolve_path(&doc.path) {
        Ok(path) => path,
        Err(err) => return Ok(report(ctx, &err)),
    };
    let spec = match path_arg(&path) {
        Ok(arg) => file_spec(arg, revision),
        Err(err) => return Ok(report(ctx, &err)),
    };
    if doc.dirty {
        status(ctx, COMPARING_SAVED_COPY);
    }

    let request = CommandRequest::new(Operation::Print)
        .arg("-q")
        .arg(spec);
    let depot_copy = match route(ctx.dispatcher.run(request).await) {
        Ok(stdout) => stdout,
        Err(err) => return Ok(report(ctx, &err)),
    };

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = write_depot_copy(&name, &depot_copy)?;

    match ctx.ui.show_diff(tmp.path(), &path, &diff_title(&name, revision)) {
        Ok(()) => Ok(FlowOutcome::Completed),
        Err(err) => {
            ctx.ui.show_error(&err.to_string());
            Ok(FlowOutcome::Failed)
        }
    }
}

/// Ask for a revision, then diff against it.
///
/// Input without a leading number compares against the most recent
/// revision. A dismissed prompt runs nothing.
pub async fn run_revision(ctx: &RuntimeContext) -> Result<FlowOutcome> {
    let Some(answer) = ctx.ui.prompt_for_text(REVISION_PROMPT) else {
        return Ok(FlowOutcome::Cancelled);
    };
    run(ctx, parse_revision(&answer)).await
}

/// Page `p4 diff` output for the active document.
pub async fn run_raw(ctx: &RuntimeContext) -> Result<FlowOutcome> {
    let Some(doc) = require_file(ctx) else {
        return Ok(FlowOutcome::NothingToDo);
    };
    if require_folder(ctx).is_none() {
        return Ok(FlowOutcome::NothingToDo);
    }

    let request = match CommandRequest::new(Operation::Diff).with_path(&doc.path) {
        Ok(request) => request,
        Err(err) => return Ok(report(ctx, &err)),
    };
    match route_text(ctx.dispatcher.run(request).await) {
        Ok(stdout) => {
            ctx.output.append(Operation::Diff, &stdout);
            pager::page(&stdout);
            Ok(FlowOutcome::Completed)
        }
        Err(err) => Ok(report(ctx, &err)),
    }
}

/// Write the depot copy to a temporary file named after the document, so
/// diff tools can pick a syntax from the extension.
fn write_depot_copy(name: &str, content: &[u8]) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("p4x-")
        .suffix(&format!("-{name}"))
        .tempfile()
        .context("failed to create temporary file")?;
    file.write_all(content)
        .and_then(|()| file.flush())
        .context("failed to write depot copy")?;
    Ok(file)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::NO_FILE_SELECTED;
    use crate::commands::test_support::Fixture;
    use perforce_ui::ActiveDocument;
    use pretty_assertions::assert_eq;

    const PRINT_OLD: &str = r#"case "$1" in print) printf 'depot line\n' ;; esac"#;

    #[tokio::test]
    async fn diff_against_most_recent() {
        let fx = Fixture::new(PRINT_OLD);
        let file = fx.open_file("a.txt", "local line\n");

        assert_eq!(run(&fx.ctx, None).await.unwrap(), FlowOutcome::Completed);

        assert_eq!(fx.calls(), vec![format!("print -q {}", file.display())]);
        let diffs = fx.ui.diffs();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].left_content, "depot line\n");
        assert_eq!(diffs[0].right, file);
        assert_eq!(diffs[0].title, "a.txt - Diff Against Most Recent Revision");
    }

    #[tokio::test]
    async fn diff_against_revision() {
        let fx = Fixture::new(PRINT_OLD);
        let file = fx.open_file("a.txt", "");

        run(&fx.ctx, Some(4)).await.unwrap();

        assert_eq!(fx.calls(), vec![format!("print -q {}#4", file.display())]);
        assert_eq!(fx.ui.diffs()[0].title, "a.txt - Diff Against Revision #4");
    }

    #[tokio::test]
    async fn dirty_document_notes_saved_copy() {
        let fx = Fixture::new(PRINT_OLD);
        let file = fx.open_file("a.txt", "");
        fx.ui.set_active(Some(ActiveDocument {
            path: file,
            untitled: false,
            dirty: true,
        }));

        assert_eq!(run(&fx.ctx, None).await.unwrap(), FlowOutcome::Completed);
        assert_eq!(fx.ui.status_texts(), vec![COMPARING_SAVED_COPY]);
    }

    #[tokio::test]
    async fn untitled_document_is_skipped() {
        let fx = Fixture::new(PRINT_OLD);
        fx.ui.set_active(Some(ActiveDocument {
            path: "Untitled-1".into(),
            untitled: true,
            dirty: true,
        }));

        assert_eq!(run(&fx.ctx, None).await.unwrap(), FlowOutcome::NothingToDo);
        assert!(fx.calls().is_empty());
        assert!(fx.ui.diffs().is_empty());
    }

    #[tokio::test]
    async fn no_file_checked_before_folder() {
        let fx = Fixture::without_root(PRINT_OLD);
        assert_eq!(run(&fx.ctx, None).await.unwrap(), FlowOutcome::NothingToDo);
        assert_eq!(fx.ui.status_texts(), vec![NO_FILE_SELECTED]);
    }

    #[tokio::test]
    async fn print_failure_is_shown() {
        let fx = Fixture::new(r#"echo "$3 - no such file(s)." >&2"#);
        let file = fx.open_file("a.txt", "");

        assert_eq!(run(&fx.ctx, None).await.unwrap(), FlowOutcome::Failed);
        assert_eq!(
            fx.ui.errors(),
            vec![format!("{} - no such file(s).", file.display())]
        );
        assert!(fx.ui.diffs().is_empty());
    }

    #[tokio::test]
    async fn revision_prompt_parses_leading_digits() {
        let fx = Fixture::new(PRINT_OLD);
        let file = fx.open_file("a.txt", "");
        fx.ui.answer(Some("12abc"));

        run_revision(&fx.ctx).await.unwrap();

        assert_eq!(*fx.ui.prompts.lock().unwrap(), vec![REVISION_PROMPT]);
        assert_eq!(fx.calls(), vec![format!("print -q {}#12", file.display())]);
    }

    #[tokio::test]
    async fn non_numeric_revision_means_most_recent() {
        let fx = Fixture::new(PRINT_OLD);
        fx.open_file("a.txt", "");
        fx.ui.answer(Some("latest"));

        run_revision(&fx.ctx).await.unwrap();

        assert_eq!(
            fx.ui.diffs()[0].title,
            "a.txt - Diff Against Most Recent Revision"
        );
    }

    #[tokio::test]
    async fn dismissed_prompt_runs_nothing() {
        let fx = Fixture::new(PRINT_OLD);
        fx.open_file("a.txt", "");
        fx.ui.answer(None);

        assert_eq!(run_revision(&fx.ctx).await.unwrap(), FlowOutcome::Cancelled);
        assert!(fx.calls().is_empty());
    }

    #[tokio::test]
    async fn raw_diff_runs_p4_diff() {
        let fx = Fixture::new(r#"echo "==== $2#3 - $2 ====""#);
        let file = fx.open_file("a.txt", "");

        assert_eq!(run_raw(&fx.ctx).await.unwrap(), FlowOutcome::Completed);
        assert_eq!(fx.calls(), vec![format!("diff {}", file.display())]);
        assert!(fx.output_log().contains("] p4 diff\n===="));
    }

    #[test]
    fn depot_copy_keeps_extension() {
        let tmp = write_depot_copy("lib.rs", b"fn main() {}\n").unwrap();
        let name = tmp.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("p4x-"));
        assert!(name.ends_with("-lib.rs"));
        assert_eq!(std::fs::read_to_string(tmp.path()).unwrap(), "fn main() {}\n");
    }
}
