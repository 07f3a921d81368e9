//! Output helpers for the `p4x` CLI.
//!
//! JSON printing for `--json`, and the output log: an append-only file
//! that collects what p4 printed for each command, shown by
//! `p4x show-output`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use perforce_core::Operation;
use serde::Serialize;
use tracing::warn;

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Append-only log of p4 output.
#[derive(Debug, Clone)]
pub struct OutputLog {
    path: PathBuf,
}

impl OutputLog {
    /// A log stored at `path`. Nothing is created until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the log lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the output of `operation`, stamped with the local time.
    ///
    /// Logging is best effort: failures are traced and otherwise ignored.
    pub fn append(&self, operation: Operation, text: &str) {
        if let Err(err) = self.try_append(operation, text) {
            warn!(path = %self.path.display(), error = %err, "failed to write output log");
        }
    }

    fn try_append(&self, operation: Operation, text: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{stamp}] p4 {operation}")?;
        let body = text.trim_end();
        if !body.is_empty() {
            writeln!(file, "{body}")?;
        }
        Ok(())
    }

    /// The whole log. A log that was never written reads as empty.
    pub fn read(&self) -> io::Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = OutputLog::new(dir.path().join("never.log"));
        assert_eq!(log.read().unwrap(), "");
    }

    #[test]
    fn append_records_operation_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let log = OutputLog::new(dir.path().join("logs/output.log"));
        log.append(Operation::Add, "//depot/a.txt#1 - opened for add\n");
        log.append(Operation::Info, "");

        let content = log.read().unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("] p4 add"));
        assert_eq!(lines[1], "//depot/a.txt#1 - opened for add");
        assert!(lines[2].ends_with("] p4 info"));
    }
}
