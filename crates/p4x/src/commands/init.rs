//! `p4x init` -- write the effective settings to `.p4x/config.yaml`.

use std::env;

use anyhow::{Context, Result};
use perforce_config::config::config_path;
use perforce_config::save_config;

use super::{FlowOutcome, status};
use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `p4x init` command.
///
/// Writes to the workspace root if one is known, else the current
/// directory. An existing file is kept unless `--force` is given.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<FlowOutcome> {
    let root = match &ctx.workspace_root {
        Some(root) => root.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };
    let path = config_path(&root);

    if path.exists() && !args.force {
        status(
            ctx,
            &format!("Perforce: {} already exists (use --force to overwrite)", path.display()),
        );
        return Ok(FlowOutcome::NothingToDo);
    }

    save_config(&root, &ctx.config)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config written");

    if ctx.json {
        output_json(&serde_json::json!({ "path": path }));
    } else {
        status(ctx, &format!("Perforce: wrote {}", path.display()));
    }
    Ok(FlowOutcome::Completed)
}
