//! Terminal detection utilities.
//!
//! TTY status, terminal height and whether ANSI color should be used.

use std::env;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Returns `true` if stderr is connected to a terminal. Status lines and
/// prompts go to stderr.
pub fn is_stderr_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stderr())
}

/// Returns the terminal height in rows, or 0 if detection fails.
pub fn terminal_height() -> usize {
    crossterm::terminal::size()
        .map(|(_cols, rows)| rows as usize)
        .unwrap_or(0)
}

/// Determines if ANSI color codes should be used.
///
/// Respects standard conventions:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection on stderr
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }

    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }

    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }

    is_stderr_tty()
}
