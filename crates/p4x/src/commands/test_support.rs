//! Test doubles for command flows: a recording [`Ui`] and a workspace
//! whose `p4` is a shell script.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use perforce_config::P4xConfig;
use perforce_ui::{ActiveDocument, PickItem, Ui, UiError};
use tempfile::TempDir;

use crate::context::RuntimeContext;

/// A diff the flow asked to show. The left file is read eagerly since it
/// is usually a temporary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDiff {
    pub left_content: String,
    pub right: PathBuf,
    pub title: String,
}

/// A [`Ui`] that records every call and answers from queues.
#[derive(Default)]
pub struct RecordingUi {
    pub active: Mutex<Option<ActiveDocument>>,
    pub statuses: Mutex<Vec<(String, Duration)>>,
    pub errors: Mutex<Vec<String>>,
    pub lists: Mutex<Vec<(Vec<PickItem>, Option<String>)>>,
    pub picks: Mutex<VecDeque<Option<usize>>>,
    pub prompts: Mutex<Vec<String>>,
    pub answers: Mutex<VecDeque<Option<String>>>,
    pub opened: Mutex<Vec<PathBuf>>,
    pub diffs: Mutex<Vec<RecordedDiff>>,
}

impl RecordingUi {
    pub fn set_active(&self, doc: Option<ActiveDocument>) {
        *self.active.lock().unwrap() = doc;
    }

    pub fn pick(&self, answer: Option<usize>) {
        self.picks.lock().unwrap().push_back(answer);
    }

    pub fn answer(&self, answer: Option<&str>) {
        self.answers
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
    }

    pub fn status_texts(&self) -> Vec<String> {
        self.statuses
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }

    pub fn diffs(&self) -> Vec<RecordedDiff> {
        self.diffs.lock().unwrap().clone()
    }
}

impl Ui for RecordingUi {
    fn show_status_message(&self, text: &str, duration: Duration) {
        self.statuses.lock().unwrap().push((text.to_string(), duration));
    }

    fn show_error(&self, text: &str) {
        self.errors.lock().unwrap().push(text.to_string());
    }

    fn show_selectable_list(&self, items: &[PickItem], placeholder: Option<&str>) -> Option<usize> {
        self.lists
            .lock()
            .unwrap()
            .push((items.to_vec(), placeholder.map(str::to_string)));
        self.picks.lock().unwrap().pop_front().flatten()
    }

    fn prompt_for_text(&self, prompt: &str) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers.lock().unwrap().pop_front().flatten()
    }

    fn open_document(&self, path: &Path) -> perforce_ui::Result<()> {
        if !path.exists() {
            return Err(UiError::Launch {
                program: "editor".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn show_diff(&self, left: &Path, right: &Path, title: &str) -> perforce_ui::Result<()> {
        let left_content = std::fs::read_to_string(left).unwrap_or_default();
        self.diffs.lock().unwrap().push(RecordedDiff {
            left_content,
            right: right.to_path_buf(),
            title: title.to_string(),
        });
        Ok(())
    }

    fn active_document(&self) -> Option<ActiveDocument> {
        self.active.lock().unwrap().clone()
    }
}

/// A scratch workspace whose `p4` is `script`, run through `sh`.
///
/// Every invocation appends its arguments to `calls.log` before the script
/// body runs, so `$1` is the operation name.
pub struct Fixture {
    pub dir: TempDir,
    pub ctx: RuntimeContext,
    pub ui: Arc<RecordingUi>,
}

impl Fixture {
    /// A fixture whose workspace root is the scratch directory.
    pub fn new(script: &str) -> Self {
        Self::build(script, true)
    }

    /// A fixture with no known workspace root.
    pub fn without_root(script: &str) -> Self {
        Self::build(script, false)
    }

    fn build(script: &str, with_root: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let script_path = root.join("fake-p4.sh");
        let calls = root.join("calls.log");
        std::fs::write(
            &script_path,
            format!("echo \"$@\" >> '{}'\n{script}\n", calls.display()),
        )
        .unwrap();

        let config = P4xConfig {
            executable: "sh".into(),
            extra_flags: vec![script_path.to_string_lossy().into_owned()],
            timeout_secs: 10,
            output_log: Some(root.join("output.log")),
            ..P4xConfig::default()
        };
        let ui = Arc::new(RecordingUi::default());
        let ctx = RuntimeContext::from_parts(config, with_root.then(|| root.clone()), ui.clone());
        Self { dir, ctx, ui }
    }

    /// Canonical path of the scratch directory.
    pub fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().unwrap()
    }

    /// Create a file in the scratch directory and make it the active
    /// document.
    pub fn open_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, content).unwrap();
        self.ui.set_active(Some(ActiveDocument::saved(&path)));
        path
    }

    /// The argument lists `p4` was invoked with, one per call.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.root().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// The output log content.
    pub fn output_log(&self) -> String {
        self.ctx.output.read().unwrap()
    }
}
