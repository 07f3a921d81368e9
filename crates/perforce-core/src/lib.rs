//! Core types for the p4x command layer.
//!
//! This crate owns everything about a `p4` invocation that does not involve
//! actually spawning a process: the fixed operation set, request and result
//! types, the error taxonomy, result classification and the parsers for the
//! line-oriented output of `opened`, `where` and friends.

pub mod error;
pub mod operation;
pub mod parse;
pub mod request;
pub mod router;

pub use error::{P4Error, Result};
pub use operation::Operation;
pub use request::{CommandRequest, CommandResult, ExitError};
