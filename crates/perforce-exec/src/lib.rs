//! Process invocation for the p4x command layer.
//!
//! This crate spawns the `p4` executable for a [`CommandRequest`] and
//! delivers exactly one [`CommandResult`] per spawn. It also locates the
//! workspace root that commands run in by default.
//!
//! [`CommandRequest`]: perforce_core::CommandRequest
//! [`CommandResult`]: perforce_core::CommandResult

pub mod dispatcher;
pub mod workspace;

pub use dispatcher::{CommandHandle, Dispatcher};
