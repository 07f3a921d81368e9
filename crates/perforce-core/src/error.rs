//! Error taxonomy for `p4` operations.
//!
//! A user dismissing a prompt is not an error and has no variant here;
//! flows report it as a normal outcome instead.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that terminate a single `p4` operation.
#[derive(Debug, Error)]
pub enum P4Error {
    /// The executable was not found or could not be started.
    #[error("failed to execute {program}: {message}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying OS error, rendered.
        message: String,
    },

    /// The tool ran and reported failure, either through its exit status
    /// or by writing to stderr.
    #[error("{message}")]
    Tool {
        /// Stderr verbatim, or a description of the exit status when
        /// stderr was empty.
        message: String,
    },

    /// The tool did not finish before the configured deadline.
    #[error("command timed out after {}s", .after.as_secs())]
    TimedOut {
        /// The deadline that elapsed.
        after: Duration,
    },

    /// The tool succeeded but its output had an unexpected shape.
    #[error("unexpected output: {0}")]
    Parse(String),

    /// An operation name outside the supported set.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// A path argument could not be resolved to its canonical form, or is
    /// not valid UTF-8.
    #[error("failed to resolve path {}: {source}", .path.display())]
    Path {
        /// The path as given.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl P4Error {
    /// Returns `true` for errors that flows swallow as "nothing to do".
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// A specialized `Result` type for `p4` operations.
pub type Result<T> = std::result::Result<T, P4Error>;
