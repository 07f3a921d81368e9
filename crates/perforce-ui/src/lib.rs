//! The UI collaborator consumed by p4x command flows.
//!
//! Flows never print directly; they talk to a [`Ui`]. The terminal front
//! end in [`console`] implements it with colored status lines, numbered
//! selection lists, `$EDITOR` and an external diff program.

pub mod console;
pub mod pager;
pub mod styles;
pub mod terminal;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub use console::TerminalUi;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised when the UI cannot perform an action.
#[derive(Debug, Error)]
pub enum UiError {
    /// Neither `$VISUAL` nor `$EDITOR` is set.
    #[error("no editor configured (set $VISUAL or $EDITOR)")]
    NoEditor,

    /// An external program could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external program exited unsuccessfully.
    #[error("{program} exited with status {code:?}")]
    ExitStatus {
        /// The program that failed.
        program: String,
        /// Its exit code, if any.
        code: Option<i32>,
    },

    /// A configured command line was empty.
    #[error("empty {0} command")]
    EmptyCommand(&'static str),
}

/// A specialized `Result` type for UI actions.
pub type Result<T> = std::result::Result<T, UiError>;

// ---------------------------------------------------------------------------
// Collaborator types
// ---------------------------------------------------------------------------

/// One entry of a selectable list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    /// Short text, e.g. a file name.
    pub label: String,
    /// Longer text shown beside the label and matched against input.
    pub description: String,
}

impl PickItem {
    /// Create an item from a label and description.
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// The document the user is working on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    /// Path of the document on disk.
    pub path: PathBuf,
    /// The document has never been saved.
    pub untitled: bool,
    /// The document has unsaved changes.
    pub dirty: bool,
}

impl ActiveDocument {
    /// A saved, clean document at `path`.
    pub fn saved(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            untitled: false,
            dirty: false,
        }
    }
}

/// The UI surface command flows report through.
///
/// Every method is synchronous and may block the calling thread on user
/// input or a child process. Async callers on a multi-threaded runtime
/// should wrap calls in `tokio::task::spawn_blocking`.
pub trait Ui: Send + Sync {
    /// Show a transient status message for roughly `duration`.
    ///
    /// Surfaces without timed messages may ignore `duration`; the call
    /// must not wait for it to elapse.
    fn show_status_message(&self, text: &str, duration: Duration);

    /// Show an error to the user.
    fn show_error(&self, text: &str);

    /// Let the user pick one of `items`. Returns the index picked, or
    /// `None` if the list was dismissed.
    fn show_selectable_list(&self, items: &[PickItem], placeholder: Option<&str>) -> Option<usize>;

    /// Ask the user for a line of text. `None` if the prompt was dismissed.
    fn prompt_for_text(&self, prompt: &str) -> Option<String>;

    /// Open `path` for editing.
    fn open_document(&self, path: &Path) -> Result<()>;

    /// Show `left` and `right` side by side under `title`.
    fn show_diff(&self, left: &Path, right: &Path, title: &str) -> Result<()>;

    /// The document currently being edited, if any.
    fn active_document(&self) -> Option<ActiveDocument>;
}
