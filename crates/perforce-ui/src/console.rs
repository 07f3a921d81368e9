//! Terminal implementation of the [`Ui`] collaborator.
//!
//! Status lines, errors and prompts go to stderr so stdout stays clean for
//! command output. Lists are numbered and answered on stdin; typing text
//! instead of a number picks the single item whose label or description
//! contains it.

use std::env;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use crate::pager;
use crate::styles::{
    render_diff_header, render_error_line, render_muted, render_pick_item, render_status_line,
};
use crate::{ActiveDocument, PickItem, Result, Ui, UiError};

/// A [`Ui`] for an interactive terminal session.
///
/// Prompts read stdin, and the editor and diff tool run as blocking child
/// processes. Status lines are printed once to stderr and stay in the
/// scrollback, so their duration is only logged.
pub struct TerminalUi {
    active: Option<ActiveDocument>,
    diff_tool: Vec<String>,
    editor: Option<String>,
    quiet: bool,
    input: Mutex<Box<dyn BufRead + Send>>,
}

impl TerminalUi {
    /// A terminal UI reading answers from stdin and launching `diff_tool`
    /// (program followed by its leading arguments) for diffs. The editor is
    /// taken from `$VISUAL`, then `$EDITOR`.
    pub fn new(diff_tool: Vec<String>) -> Self {
        let editor = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.trim().is_empty());
        Self {
            active: None,
            diff_tool,
            editor,
            quiet: false,
            input: Mutex::new(Box::new(BufReader::new(io::stdin()))),
        }
    }

    /// Set the document commands act on.
    pub fn with_active(mut self, active: Option<ActiveDocument>) -> Self {
        self.active = active;
        self
    }

    /// Use `command` (program and leading arguments) to open documents.
    pub fn with_editor(mut self, command: Option<String>) -> Self {
        self.editor = command;
        self
    }

    /// Suppress status messages. Errors are always shown.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Read answers from `input` instead of stdin.
    pub fn with_input<R: BufRead + Send + 'static>(mut self, input: R) -> Self {
        self.input = Mutex::new(Box::new(input));
        self
    }

    fn read_line(&self) -> Option<String> {
        let mut input = self.input.lock().ok()?;
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Ui for TerminalUi {
    fn show_status_message(&self, text: &str, duration: Duration) {
        debug!(text, duration_ms = duration.as_millis() as u64, "status message");
        if !self.quiet {
            eprintln!("{}", render_status_line(text));
        }
    }

    fn show_error(&self, text: &str) {
        eprintln!("{}", render_error_line(text));
    }

    fn show_selectable_list(&self, items: &[PickItem], placeholder: Option<&str>) -> Option<usize> {
        if items.is_empty() {
            return None;
        }

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", placeholder.unwrap_or("Select an item:"));
        for (idx, item) in items.iter().enumerate() {
            let _ = writeln!(stderr, "{}", render_pick_item(idx + 1, item));
        }
        let _ = write!(stderr, "{} ", render_muted(">"));
        let _ = stderr.flush();
        drop(stderr);

        let answer = self.read_line()?;
        let picked = select_item(items, &answer);
        debug!(%answer, ?picked, "selection");
        picked
    }

    fn prompt_for_text(&self, prompt: &str) -> Option<String> {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{prompt} ");
        let _ = stderr.flush();
        drop(stderr);
        self.read_line()
    }

    fn open_document(&self, path: &Path) -> Result<()> {
        let command = self.editor.as_deref().ok_or(UiError::NoEditor)?;
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or(UiError::EmptyCommand("editor"))?;

        debug!(program, path = %path.display(), "opening document");
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|source| UiError::Launch {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(UiError::ExitStatus {
                program: program.to_string(),
                code: status.code(),
            })
        }
    }

    fn show_diff(&self, left: &Path, right: &Path, title: &str) -> Result<()> {
        let (program, args) = self
            .diff_tool
            .split_first()
            .ok_or(UiError::EmptyCommand("diff"))?;

        let output = Command::new(program)
            .args(args)
            .arg(left)
            .arg(right)
            .output()
            .map_err(|source| UiError::Launch {
                program: program.clone(),
                source,
            })?;

        // diff(1) exits 1 when the files differ.
        match output.status.code() {
            Some(0) | Some(1) => {}
            code => {
                return Err(UiError::ExitStatus {
                    program: program.clone(),
                    code,
                });
            }
        }

        let body = String::from_utf8_lossy(&output.stdout);
        let mut content = render_diff_header(title);
        content.push('\n');
        if body.trim().is_empty() {
            content.push_str(&render_muted("(no differences)"));
            content.push('\n');
        } else {
            content.push_str(&body);
        }
        pager::page(&content);
        Ok(())
    }

    fn active_document(&self) -> Option<ActiveDocument> {
        self.active.clone()
    }
}

/// Resolve a selection answer to an item index.
///
/// A number in `1..=items.len()` picks that item. Other non-empty text picks
/// the only item whose label or description contains it, ignoring case.
/// Empty, out-of-range or ambiguous answers pick nothing.
pub fn select_item(items: &[PickItem], answer: &str) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }

    if let Ok(number) = answer.parse::<usize>() {
        return (1..=items.len()).contains(&number).then(|| number - 1);
    }

    let needle = answer.to_lowercase();
    let mut matches = items.iter().enumerate().filter(|(_, item)| {
        item.label.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle)
    });
    match (matches.next(), matches.next()) {
        (Some((idx, _)), None) => Some(idx),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn items() -> Vec<PickItem> {
        vec![
            PickItem::new("a.txt", "//depot/main/a.txt#3 - edit default change (text)"),
            PickItem::new("b.rs", "//depot/main/src/b.rs#1 - add default change (text)"),
            PickItem::new("c.rs", "//depot/main/src/c.rs#9 - delete change 12 (text)"),
        ]
    }

    fn ui_with_input(input: &str) -> TerminalUi {
        TerminalUi::new(vec!["diff".into(), "-u".into()])
            .with_input(Cursor::new(input.to_string()))
            .quiet(true)
    }

    #[test]
    fn status_message_does_not_wait_for_duration() {
        let ui = ui_with_input("");
        let started = std::time::Instant::now();
        ui.show_status_message("Perforce: file opened for edit", Duration::from_secs(60));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn select_by_number() {
        assert_eq!(select_item(&items(), "2"), Some(1));
        assert_eq!(select_item(&items(), " 3 "), Some(2));
    }

    #[test]
    fn select_out_of_range() {
        assert_eq!(select_item(&items(), "0"), None);
        assert_eq!(select_item(&items(), "4"), None);
    }

    #[test]
    fn select_by_description_text() {
        assert_eq!(select_item(&items(), "delete"), Some(2));
        assert_eq!(select_item(&items(), "A.TXT"), Some(0));
    }

    #[test]
    fn ambiguous_or_empty_selects_nothing() {
        assert_eq!(select_item(&items(), ".rs"), None);
        assert_eq!(select_item(&items(), ""), None);
        assert_eq!(select_item(&items(), "zzz"), None);
    }

    #[test]
    fn list_reads_answer_from_input() {
        let ui = ui_with_input("2\n");
        assert_eq!(ui.show_selectable_list(&items(), Some("Pick a file")), Some(1));
    }

    #[test]
    fn list_at_eof_is_dismissed() {
        let ui = ui_with_input("");
        assert_eq!(ui.show_selectable_list(&items(), None), None);
    }

    #[test]
    fn empty_list_does_not_prompt() {
        let ui = ui_with_input("1\n");
        assert_eq!(ui.show_selectable_list(&[], None), None);
        // The answer is still unread.
        assert_eq!(ui.prompt_for_text("next?").as_deref(), Some("1"));
    }

    #[test]
    fn prompt_strips_line_ending() {
        let ui = ui_with_input("12\r\n");
        assert_eq!(ui.prompt_for_text("Revision?").as_deref(), Some("12"));
        assert_eq!(ui.prompt_for_text("Again?"), None);
    }

    #[test]
    fn active_document_is_returned() {
        let doc = ActiveDocument::saved("/ws/a.txt");
        let ui = ui_with_input("").with_active(Some(doc.clone()));
        assert_eq!(ui.active_document(), Some(doc));
    }

    #[test]
    fn open_without_editor_fails() {
        let ui = ui_with_input("").with_editor(None);
        assert!(matches!(
            ui.open_document(Path::new("/ws/a.txt")),
            Err(UiError::NoEditor)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn open_runs_editor_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let ui = ui_with_input("").with_editor(Some("true".into()));
        assert!(ui.open_document(&file).is_ok());

        let ui = ui_with_input("").with_editor(Some("false".into()));
        assert!(matches!(
            ui.open_document(&file),
            Err(UiError::ExitStatus { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn diff_accepts_differences() {
        let dir = tempfile::tempdir().unwrap();
        let left = dir.path().join("left.txt");
        let right = dir.path().join("right.txt");
        std::fs::write(&left, "one\n").unwrap();
        std::fs::write(&right, "two\n").unwrap();

        let ui = ui_with_input("");
        assert!(ui.show_diff(&left, &right, "right.txt - Diff Against Most Recent Revision").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn diff_tool_failure_is_reported() {
        let ui = TerminalUi::new(vec!["sh".into(), "-c".into(), "exit 2".into(), "sh".into()]);
        let err = ui
            .show_diff(Path::new("/tmp/l"), Path::new("/tmp/r"), "t")
            .unwrap_err();
        assert!(matches!(err, UiError::ExitStatus { code: Some(2), .. }));
    }

    #[test]
    fn missing_diff_tool_is_launch_error() {
        let ui = TerminalUi::new(vec!["/nonexistent/bin/p4x-diff".into()]);
        let err = ui
            .show_diff(Path::new("/tmp/l"), Path::new("/tmp/r"), "t")
            .unwrap_err();
        assert!(matches!(err, UiError::Launch { .. }));
    }
}
