//! Result routing: classify a finished child process and hand its output
//! to the caller, or to the parser for the operation that produced it.
//!
//! Classification follows the `p4` convention of writing usage and
//! validation errors to stderr even when it exits zero, so any stderr text
//! counts as failure.

use crate::error::{P4Error, Result};
use crate::parse::{OpenedFileRecord, WhereMapping, parse_opened, parse_where};
use crate::request::{CommandResult, ExitError};

/// How a finished command is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Clean exit, nothing on stderr.
    Success,
    /// Clean exit but stderr was not empty. Reported the same as `Fatal`.
    StderrAsError,
    /// The process failed to start, exited non-zero, or timed out.
    Fatal,
}

impl Classification {
    /// Returns `true` if the caller should see this as a failure.
    pub fn is_error(self) -> bool {
        !matches!(self, Self::Success)
    }
}

/// Classify a command result.
///
/// An exit error always wins, regardless of output.
pub fn classify(result: &CommandResult) -> Classification {
    if result.exit_error.is_some() {
        Classification::Fatal
    } else if !result.stderr.is_empty() {
        Classification::StderrAsError
    } else {
        Classification::Success
    }
}

/// Route a result: stdout on success, a [`P4Error`] otherwise.
///
/// # Errors
///
/// Returns [`P4Error::Spawn`] or [`P4Error::TimedOut`] for the matching exit
/// errors, and [`P4Error::Tool`] carrying stderr verbatim for everything
/// else that does not classify as success.
pub fn route(result: CommandResult) -> Result<Vec<u8>> {
    let class = classify(&result);
    if !class.is_error() {
        return Ok(result.stdout);
    }

    let stderr = result.stderr_text().trim_end().to_string();
    match result.exit_error {
        Some(ExitError::Spawn { program, source }) => Err(P4Error::Spawn {
            program,
            message: source.to_string(),
        }),
        Some(ExitError::TimedOut { after, .. }) => Err(P4Error::TimedOut { after }),
        Some(other) if stderr.is_empty() => Err(P4Error::Tool {
            message: other.to_string(),
        }),
        // Whitespace-only stderr still fails, but needs a readable message.
        None if stderr.is_empty() => Err(P4Error::Tool {
            message: WHITESPACE_STDERR.to_string(),
        }),
        _ => Err(P4Error::Tool { message: stderr }),
    }
}

/// Message for a clean exit whose stderr held nothing but whitespace.
const WHITESPACE_STDERR: &str = "p4 wrote only whitespace to stderr";

/// Route a result and decode stdout as text.
///
/// # Errors
///
/// See [`route`].
pub fn route_text(result: CommandResult) -> Result<String> {
    route(result).map(|stdout| String::from_utf8_lossy(&stdout).into_owned())
}

/// Route the result of `p4 opened` into file records.
///
/// # Errors
///
/// See [`route`]. Empty output is not an error.
pub fn route_opened(result: CommandResult) -> Result<Vec<OpenedFileRecord>> {
    route_text(result).map(|stdout| parse_opened(&stdout))
}

/// Route the result of `p4 where` into a path mapping.
///
/// # Errors
///
/// See [`route`]. Returns [`P4Error::Parse`] when the output has fewer
/// than three space-separated fields.
pub fn route_where(result: CommandResult) -> Result<WhereMapping> {
    let stdout = route_text(result)?;
    parse_where(&stdout).ok_or_else(|| {
        P4Error::Parse(format!("expected '<depot> <client> <local>', got '{}'", stdout.trim()))
    })
}
