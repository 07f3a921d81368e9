//! Pager support for long output such as diffs and the output log.
//!
//! Pipes content through `less -RFX` (or `$PAGER`) when it exceeds the
//! terminal height.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::terminal::{is_tty, terminal_height};

/// Returns `true` if the content exceeds the terminal height and should be paged.
///
/// Returns `false` if:
/// - `P4X_NO_PAGER` environment variable is set
/// - stdout is not a TTY
/// - terminal height cannot be determined
/// - content fits within the terminal
pub fn should_page(content: &str) -> bool {
    if env::var_os("P4X_NO_PAGER").is_some() {
        return false;
    }

    if !is_tty() {
        return false;
    }

    let height = terminal_height();
    if height == 0 {
        return false;
    }

    // Leave one line for the shell prompt.
    content_line_count(content) > height.saturating_sub(1)
}

/// Pipes content through a pager if appropriate, otherwise prints directly.
///
/// The pager command is `P4X_PAGER`, then `PAGER`, then `less`. When the
/// pager is `less`, `LESS=-RFX` is set unless `LESS` is already set.
pub fn page(content: &str) {
    if !should_page(content) {
        print!("{}", content);
        return;
    }

    let pager_cmd = get_pager_command();
    let parts: Vec<&str> = pager_cmd.split_whitespace().collect();
    let Some((program, args)) = parts.split_first() else {
        print!("{}", content);
        return;
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    if env::var_os("LESS").is_none() {
        cmd.env("LESS", "-RFX");
    }

    match cmd.spawn() {
        Ok(mut child) => {
            if let Some(ref mut stdin) = child.stdin {
                // Broken pipe when the user quits the pager early.
                let _ = stdin.write_all(content.as_bytes());
            }
            drop(child.stdin.take());
            let _ = child.wait();
        }
        Err(err) => {
            tracing::debug!(pager = %pager_cmd, error = %err, "pager failed to launch");
            print!("{}", content);
        }
    }
}

/// Returns the pager command to use.
fn get_pager_command() -> String {
    for var in ["P4X_PAGER", "PAGER"] {
        if let Ok(pager) = env::var(var) {
            if !pager.is_empty() {
                return pager;
            }
        }
    }
    "less".to_string()
}

fn content_line_count(content: &str) -> usize {
    content.lines().count()
}
