//! `p4x completion` -- generate shell completions.
//!
//! Uses `clap_complete` to generate shell completion scripts for
//! Bash, Zsh, Fish, and PowerShell.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};

use super::FlowOutcome;
use crate::cli::{Cli, CompletionArgs, CompletionCommands};
use crate::context::RuntimeContext;

/// Execute the `p4x completion` command.
pub fn run(_ctx: &RuntimeContext, args: &CompletionArgs) -> Result<FlowOutcome> {
    let shell = match &args.command {
        CompletionCommands::Bash => Shell::Bash,
        CompletionCommands::Zsh => Shell::Zsh,
        CompletionCommands::Fish => Shell::Fish,
        CompletionCommands::Powershell => Shell::PowerShell,
    };

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "p4x", &mut std::io::stdout());

    Ok(FlowOutcome::Completed)
}
