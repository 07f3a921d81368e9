//! `p4` command dispatch.
//!
//! A [`Dispatcher`] turns a [`CommandRequest`] into one child process
//! running on the tokio runtime. The call returns as soon as the child task
//! is scheduled; the caller either awaits the returned [`CommandHandle`] or
//! passes a completion callback to [`Dispatcher::execute`].
//!
//! Every dispatch is independent: there is no process reuse, no queueing
//! and no ordering between two in-flight commands.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use perforce_core::{CommandRequest, CommandResult, ExitError, Operation};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Spawns the `p4` executable for each request.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    executable: String,
    global_flags: Vec<String>,
    default_cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher for `executable` with no global flags, no default
    /// working directory and no timeout.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            global_flags: Vec::new(),
            default_cwd: None,
            timeout: None,
        }
    }

    /// Flags placed before the operation name on every invocation,
    /// e.g. `-p ssl:perforce:1666 -u alice`.
    pub fn global_flags(mut self, flags: Vec<String>) -> Self {
        self.global_flags = flags;
        self
    }

    /// Working directory used when a request has no override. Usually the
    /// workspace root.
    pub fn default_cwd(mut self, dir: Option<PathBuf>) -> Self {
        self.default_cwd = dir;
        self
    }

    /// Kill children that run longer than `timeout`. `None` waits forever.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The executable this dispatcher runs.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// The full argument vector for `request`, starting with the executable:
    /// `[executable, global flags..., operation, arguments...]`.
    pub fn command_line(&self, request: &CommandRequest) -> Vec<String> {
        let mut argv = Vec::with_capacity(2 + self.global_flags.len() + request.arguments.len());
        argv.push(self.executable.clone());
        argv.extend(self.global_flags.iter().cloned());
        argv.push(request.operation.as_str().to_string());
        argv.extend(request.arguments.iter().cloned());
        argv
    }

    /// The directory the child for `request` will run in.
    pub fn working_dir<'a>(&'a self, request: &'a CommandRequest) -> Option<&'a Path> {
        request
            .working_directory_override
            .as_deref()
            .or(self.default_cwd.as_deref())
    }

    /// Spawn the child for `request` and return a handle resolving to its
    /// result.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, request: CommandRequest) -> CommandHandle {
        let mut argv = self.command_line(&request);
        let program = argv.remove(0);
        let cwd = self.working_dir(&request).map(Path::to_path_buf);
        let operation = request.operation;

        debug!(%operation, ?argv, ?cwd, "dispatching p4 command");

        let inner = tokio::spawn(run_process(
            operation,
            program.clone(),
            argv,
            cwd,
            self.timeout,
        ));
        CommandHandle {
            operation,
            program,
            inner,
        }
    }

    /// Spawn the child for `request` and wait for its result.
    pub async fn run(&self, request: CommandRequest) -> CommandResult {
        self.spawn(request).await
    }

    /// Spawn the child for `request` and call `on_complete` with its result
    /// once it finishes. Returns without waiting.
    pub fn execute<F>(&self, request: CommandRequest, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(CommandResult) + Send + 'static,
    {
        let handle = self.spawn(request);
        tokio::spawn(async move {
            on_complete(handle.await);
        })
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// A running `p4` command. Resolves to its [`CommandResult`].
#[derive(Debug)]
pub struct CommandHandle {
    operation: Operation,
    /// The executable, reported if the task is lost.
    program: String,
    inner: JoinHandle<CommandResult>,
}

impl CommandHandle {
    /// The operation this handle is running.
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Future for CommandHandle {
    type Output = CommandResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        Pin::new(&mut this.inner).poll(cx).map(|joined| {
            joined.unwrap_or_else(|err| {
                CommandResult::failed(ExitError::Wait {
                    program: this.program.clone(),
                    source: std::io::Error::other(err.to_string()),
                })
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Child process
// ---------------------------------------------------------------------------

async fn run_process(
    operation: Operation,
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
) -> CommandResult {
    let started = Instant::now();

    let mut cmd = Command::new(&program);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &cwd {
        cmd.current_dir(dir);
    }

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            warn!(%operation, %program, error = %source, "failed to spawn p4");
            return CommandResult::failed(ExitError::Spawn { program, source });
        }
    };

    // Dropping the wait future on timeout drops the child, which kills it.
    let waited = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(waited) => waited,
            Err(_) => {
                warn!(%operation, after_ms = limit.as_millis() as u64, "p4 command timed out");
                return CommandResult::failed(ExitError::TimedOut {
                    program,
                    after: limit,
                });
            }
        },
        None => child.wait_with_output().await,
    };

    let output = match waited {
        Ok(output) => output,
        Err(source) => return CommandResult::failed(ExitError::Wait { program, source }),
    };

    info!(
        %operation,
        code = ?output.status.code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        stderr_bytes = output.stderr.len(),
        "p4 command finished"
    );

    let exit_error = if output.status.success() {
        None
    } else {
        Some(ExitError::Status {
            program,
            code: output.status.code(),
        })
    };

    CommandResult {
        exit_error,
        stdout: output.stdout,
        stderr: output.stderr,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
