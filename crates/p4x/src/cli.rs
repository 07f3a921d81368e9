//! Clap CLI definitions for the `p4x` command.
//!
//! Each subcommand corresponds to one editor action. File-based actions
//! take the active document as an optional positional argument so that an
//! editor can call them with whatever it has open.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

/// p4x -- Perforce actions for editors.
///
/// Runs `p4` for the document you are editing and reports the result as
/// short status lines, pick lists and diffs.
#[derive(Parser, Debug)]
#[command(
    name = "p4x",
    about = "Perforce actions for editors",
    long_about = "Runs p4 for the document you are editing and reports the result as short status lines, pick lists and diffs.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Workspace root (default: nearest directory with a P4CONFIG file or .p4x/).
    #[arg(long, global = true, env = "P4X_ROOT")]
    pub root: Option<PathBuf>,

    /// Server address passed to p4 as -p.
    #[arg(long, global = true)]
    pub port: Option<String>,

    /// User passed to p4 as -u.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Client workspace passed to p4 as -c.
    #[arg(long, global = true)]
    pub client: Option<String>,

    /// Seconds before a p4 command is killed (0 waits forever).
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// The active document has unsaved changes.
    #[arg(long, global = true)]
    pub unsaved: bool,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress status messages (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a new file to add it to the depot.
    Add(FileArgs),

    /// Open an existing file for edit.
    Edit(FileArgs),

    /// Discard changes from an opened file.
    Revert(FileArgs),

    /// Mark a file for delete.
    Delete(FileArgs),

    /// Display diff of client file with depot file.
    Diff(DiffArgs),

    /// Display diff of client file with depot file at a revision you are prompted for.
    DiffRevision(FileArgs),

    /// Display client/server information.
    Info,

    /// View opened files and open one in the editor.
    Opened,

    /// Show where a depot file lives locally.
    #[command(name = "where")]
    WhereCmd(WhereArgs),

    /// Choose a Perforce command from a list.
    Menu(FileArgs),

    /// Show the log of p4 output.
    ShowOutput,

    /// Write the effective settings to .p4x/config.yaml.
    Init(InitArgs),

    /// Generate shell completion scripts.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

impl Commands {
    /// The document the command acts on, if it takes one.
    pub fn active_file(&self) -> Option<&Path> {
        match self {
            Self::Add(args)
            | Self::Edit(args)
            | Self::Revert(args)
            | Self::Delete(args)
            | Self::DiffRevision(args)
            | Self::Menu(args) => args.file.as_deref(),
            Self::Diff(args) => args.file.as_deref(),
            _ => None,
        }
    }
}

/// Arguments for commands acting on the active document.
#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// The active document.
    pub file: Option<PathBuf>,
}

/// Arguments for `p4x init`.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `p4x diff`.
#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    /// The active document.
    pub file: Option<PathBuf>,

    /// Depot revision to compare against (default: most recent).
    #[arg(short = 'r', long)]
    pub revision: Option<u32>,

    /// Show p4's own unified diff instead of launching the diff tool.
    #[arg(long, conflicts_with = "revision")]
    pub raw: bool,
}

/// Arguments for `p4x where`.
#[derive(Args, Debug, Clone)]
pub struct WhereArgs {
    /// Depot path, e.g. //depot/main/src/lib.rs. A trailing #rev is ignored.
    pub depot_path: String,
}

/// Arguments for `p4x completion`.
#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Shells that completions can be generated for.
#[derive(Subcommand, Debug, Clone)]
pub enum CompletionCommands {
    /// Generate bash completions.
    Bash,
    /// Generate zsh completions.
    Zsh,
    /// Generate fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
