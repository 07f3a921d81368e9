//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds everything a command handler needs: the
//! merged configuration, the dispatcher that runs `p4`, the UI to report
//! through, the output log and the workspace root. It is built once in
//! `main` and passed by reference to every command.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use perforce_config::{P4xConfig, load_config};
use perforce_exec::Dispatcher;
use perforce_exec::workspace::{find_workspace_root, p4config_name};
use perforce_ui::{ActiveDocument, TerminalUi, Ui};

use crate::cli::GlobalArgs;
use crate::output::OutputLog;

/// Runtime context passed to every command handler.
pub struct RuntimeContext {
    /// Merged configuration (defaults, file, env, flags).
    pub config: P4xConfig,

    /// Runs `p4` for command requests.
    pub dispatcher: Dispatcher,

    /// Where status, errors, lists and diffs are shown.
    pub ui: Arc<dyn Ui>,

    /// Log of p4 output.
    pub output: OutputLog,

    /// The workspace root, if one was given or discovered.
    pub workspace_root: Option<PathBuf>,

    /// Whether to produce JSON output.
    pub json: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments and the file
    /// the command acts on.
    ///
    /// The workspace root is `--root` if given, else the nearest ancestor of
    /// the current directory with a P4CONFIG file or `.p4x/` directory.
    pub fn from_global_args(global: &GlobalArgs, active_file: Option<&Path>) -> Result<Self> {
        let workspace_root = match &global.root {
            Some(root) => Some(
                root.canonicalize()
                    .with_context(|| format!("workspace root {} not found", root.display()))?,
            ),
            None => env::current_dir()
                .ok()
                .and_then(|cwd| find_workspace_root(&cwd, &p4config_name())),
        };

        let mut config = load_config(workspace_root.as_deref()).context("failed to load config")?;
        apply_flag_overrides(&mut config, global);

        let active = active_file.map(|path| ActiveDocument {
            path: path.to_path_buf(),
            untitled: !path.exists(),
            dirty: global.unsaved,
        });
        let ui = TerminalUi::new(config.diff_command())
            .with_active(active)
            .quiet(global.quiet);

        let mut ctx = Self::from_parts(config, workspace_root, Arc::new(ui));
        ctx.json = global.json;
        Ok(ctx)
    }

    /// Assemble a context from already-resolved parts.
    pub fn from_parts(config: P4xConfig, workspace_root: Option<PathBuf>, ui: Arc<dyn Ui>) -> Self {
        let dispatcher = Dispatcher::new(config.executable.clone())
            .global_flags(config.global_flags())
            .default_cwd(workspace_root.clone())
            .timeout(config.timeout());
        let output = OutputLog::new(config.output_log_path());

        tracing::debug!(
            executable = %config.executable,
            root = ?workspace_root,
            timeout = ?config.timeout(),
            "runtime context ready"
        );

        Self {
            config,
            dispatcher,
            ui,
            output,
            workspace_root,
            json: false,
        }
    }
}

/// Command-line flags win over file and environment settings.
fn apply_flag_overrides(config: &mut P4xConfig, global: &GlobalArgs) {
    if let Some(port) = &global.port {
        config.port = Some(port.clone());
    }
    if let Some(user) = &global.user {
        config.user = Some(user.clone());
    }
    if let Some(client) = &global.client {
        config.client = Some(client.clone());
    }
    if let Some(timeout) = global.timeout {
        config.timeout_secs = timeout;
    }
}
