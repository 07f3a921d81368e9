//! Request and result types for a single `p4` invocation.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::error::P4Error;
use crate::operation::Operation;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One logical `p4` command, built per invocation and consumed by the
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// The subcommand to run.
    pub operation: Operation,
    /// Positional arguments following the subcommand.
    pub arguments: Vec<String>,
    /// Working directory for the child; falls back to the workspace root.
    pub working_directory_override: Option<PathBuf>,
}

impl CommandRequest {
    /// Create a request with no arguments.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            arguments: Vec::new(),
            working_directory_override: None,
        }
    }

    /// Append a literal argument such as a depot path or a flag.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    /// Append a filesystem path, resolved to its canonical absolute form.
    ///
    /// # Errors
    ///
    /// Returns [`P4Error::Path`] if the path does not exist, cannot be
    /// canonicalized, or is not valid UTF-8.
    pub fn with_path(mut self, path: &Path) -> Result<Self, P4Error> {
        let resolved = resolve_path(path)?;
        let arg = path_arg(&resolved)?.to_string();
        self.arguments.push(arg);
        Ok(self)
    }

    /// Run the child in `dir` instead of the workspace root. The directory
    /// is canonicalized like path arguments.
    ///
    /// # Errors
    ///
    /// Returns [`P4Error::Path`] if the directory cannot be canonicalized.
    pub fn in_dir(mut self, dir: Option<&Path>) -> Result<Self, P4Error> {
        self.working_directory_override = dir.map(resolve_path).transpose()?;
        Ok(self)
    }
}

/// Resolve `path` to its canonical absolute form, dereferencing symlinks.
///
/// # Errors
///
/// Returns [`P4Error::Path`] if the path cannot be canonicalized.
pub fn resolve_path(path: &Path) -> Result<PathBuf, P4Error> {
    path.canonicalize().map_err(|source| P4Error::Path {
        path: path.to_path_buf(),
        source,
    })
}

/// Borrow `path` as a command-line argument for `p4`.
///
/// A lossy conversion would name a different file, so non-UTF-8 paths are
/// rejected instead.
///
/// # Errors
///
/// Returns [`P4Error::Path`] with [`io::ErrorKind::InvalidData`] if the
/// path is not valid UTF-8.
pub fn path_arg(path: &Path) -> Result<&str, P4Error> {
    path.to_str().ok_or_else(|| P4Error::Path {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
    })
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Why a child process did not complete cleanly.
#[derive(Debug, Error)]
pub enum ExitError {
    /// The program could not be started.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// The program name or path.
        program: String,
        /// The OS error from spawn.
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("{program} {}", describe_code(.code))]
    Status {
        /// The program name or path.
        program: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
    },

    /// The program was killed after exceeding the deadline.
    #[error("{program} timed out after {}s", .after.as_secs())]
    TimedOut {
        /// The program name or path.
        program: String,
        /// The deadline that elapsed.
        after: Duration,
    },

    /// The program started but its output could not be collected.
    #[error("failed to collect output of {program}: {source}")]
    Wait {
        /// The program name or path.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

/// The completion of one child process: exactly one result per spawn.
#[derive(Debug, Default)]
pub struct CommandResult {
    /// Set when the process failed to start, failed, or timed out.
    pub exit_error: Option<ExitError>,
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
}

impl CommandResult {
    /// A result with empty output and the given exit error.
    pub fn failed(exit_error: ExitError) -> Self {
        Self {
            exit_error: Some(exit_error),
            ..Self::default()
        }
    }

    /// Standard output decoded lossily.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded lossily.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}
