//! Parsers for the line-oriented text `p4` writes to stdout.
//!
//! None of these handle quoting: `p4` output is split on plain spaces and
//! newlines, so depot or local paths containing spaces are mis-parsed.

use serde::Serialize;

/// One line of `p4 opened` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenedFileRecord {
    /// Depot path without the revision marker, e.g. `//depot/a/b.txt`.
    pub depot_path: String,
    /// The full output line, e.g. `//depot/a/b.txt#3 - edit default change (text)`.
    pub description: String,
    /// The file name component of the depot path, e.g. `b.txt`.
    pub label: String,
}

/// One line of `p4 where` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhereMapping {
    /// Depot-syntax path.
    pub depot_path: String,
    /// Client-syntax path.
    pub client_path: String,
    /// Local filesystem path.
    pub local_path: String,
}

/// Parse `p4 opened` output into one record per non-blank line.
///
/// Empty output yields an empty vector.
pub fn parse_opened(stdout: &str) -> Vec<OpenedFileRecord> {
    stdout
        .trim_end()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let depot_path = depot_path_of(line).unwrap_or(line).to_string();
            let label = depot_path
                .rsplit('/')
                .next()
                .unwrap_or(depot_path.as_str())
                .to_string();
            OpenedFileRecord {
                depot_path,
                description: line.to_string(),
                label,
            }
        })
        .collect()
}

/// Return the depot path of an `opened` line: everything before the first
/// `#`. Returns `None` when the line carries no revision marker.
pub fn depot_path_of(line: &str) -> Option<&str> {
    line.find('#').map(|idx| &line[..idx])
}

/// Parse `p4 where` output of the form `<depot> <client> <local>`.
///
/// Fields are split on single spaces. Returns `None` when fewer than three
/// fields are present.
pub fn parse_where(stdout: &str) -> Option<WhereMapping> {
    let fields: Vec<&str> = stdout.split(' ').collect();
    if fields.len() < 3 {
        return None;
    }
    Some(WhereMapping {
        depot_path: fields[0].trim().to_string(),
        client_path: fields[1].trim().to_string(),
        local_path: fields[2].trim().to_string(),
    })
}

/// Human-readable name of the revision a diff is taken against.
pub fn diff_label(revision: Option<u32>) -> String {
    match revision {
        Some(rev) => format!("Revision #{rev}"),
        None => "Most Recent Revision".to_string(),
    }
}

/// Title of a diff view for `file_name` against `revision`.
pub fn diff_title(file_name: &str, revision: Option<u32>) -> String {
    format!("{file_name} - Diff Against {}", diff_label(revision))
}

/// Parse user input for a revision number.
///
/// Leading whitespace is skipped and the leading run of decimal digits is
/// taken, so `"12abc"` is revision 12. Input with no leading digits (or a
/// number too large for `u32`) means "most recent" and yields `None`.
pub fn parse_revision(input: &str) -> Option<u32> {
    let trimmed = input.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Build a `p4` file spec: `path` or `path#rev`.
pub fn file_spec(path: &str, revision: Option<u32>) -> String {
    match revision {
        Some(rev) => format!("{path}#{rev}"),
        None => path.to_string(),
    }
}
