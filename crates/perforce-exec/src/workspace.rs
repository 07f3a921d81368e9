//! Workspace root discovery.
//!
//! A workspace root is the nearest ancestor directory holding a P4CONFIG
//! file (`.p4config` unless `$P4CONFIG` names another file) or a `.p4x`
//! settings directory. Commands run there unless told otherwise.

use std::env;
use std::path::{Path, PathBuf};

/// Default P4CONFIG file name when `$P4CONFIG` is unset.
pub const DEFAULT_P4CONFIG: &str = ".p4config";

/// Name of the directory holding p4x settings.
pub const SETTINGS_DIR: &str = ".p4x";

/// The P4CONFIG file name in effect: `$P4CONFIG`, or [`DEFAULT_P4CONFIG`].
pub fn p4config_name() -> String {
    match env::var("P4CONFIG") {
        Ok(name) if !name.is_empty() => name,
        _ => DEFAULT_P4CONFIG.to_string(),
    }
}

/// Walk up from `start` looking for a directory containing `config_name`
/// or a [`SETTINGS_DIR`] directory.
///
/// Returns the canonical directory, or `None` if the filesystem root is
/// reached first or `start` cannot be canonicalized.
pub fn find_workspace_root(start: &Path, config_name: &str) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;

    let mut current = start.as_path();
    loop {
        if current.join(config_name).is_file() || current.join(SETTINGS_DIR).is_dir() {
            return Some(current.to_path_buf());
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    None
}
