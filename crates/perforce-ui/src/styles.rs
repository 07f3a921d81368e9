//! Ayu color theme and styling functions for p4x terminal output.
//!
//! Uses the Ayu Dark color palette.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Only outcomes get color: red for errors, blue for status messages.
//! Depot lines in lists are muted but never decorated, so they stay easy
//! to copy.

use owo_colors::OwoColorize;

use crate::PickItem;
use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_FAIL: &str = "\u{2716}";
pub const ICON_INFO: &str = "\u{2139}";

/// Separator drawn under diff titles.
pub const SEPARATOR_LIGHT: &str = "\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}";

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

/// Renders text with fail (red) styling.
pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

/// Renders text with muted (gray) styling.
pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

/// Renders text with accent (blue) styling.
pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

/// Renders text in bold.
pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

/// Renders the light separator line in muted color.
pub fn render_separator() -> String {
    render_muted(SEPARATOR_LIGHT)
}

// ---------------------------------------------------------------------------
// Line renderers
// ---------------------------------------------------------------------------

/// A status message line: info icon and accent text.
pub fn render_status_line(text: &str) -> String {
    format!("{} {}", color_str(ICON_INFO, ACCENT), render_accent(text))
}

/// An error line: fail icon and red text. Multi-line errors keep their
/// line breaks, indented under the icon.
pub fn render_error_line(text: &str) -> String {
    let body = text.trim_end().replace('\n', "\n  ");
    format!("{} {}", color_str(ICON_FAIL, FAIL), render_fail(&body))
}

/// One numbered entry of a selection list: `  3) label  description`.
pub fn render_pick_item(number: usize, item: &PickItem) -> String {
    format!(
        "{:>3}) {}  {}",
        number,
        color_bold_str(&item.label, ACCENT),
        render_muted(&item.description)
    )
}

/// A diff header: bold title over a separator.
pub fn render_diff_header(title: &str) -> String {
    format!("{}\n{}", render_bold(title), render_separator())
}
