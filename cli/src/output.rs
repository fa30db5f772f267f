//! CLI output helpers for consistent formatting.
//!
//! Each helper paints one role of text; commands never pick colors directly.

use colored::{ColoredString, Colorize};

/// Command title
pub fn heading(text: &str) -> ColoredString {
    text.bright_cyan().bold()
}

/// Field name in a `label: value` line
pub fn label(text: &str) -> ColoredString {
    text.bright_blue()
}

/// Secondary detail such as sizes and counts
pub fn muted(text: &str) -> ColoredString {
    text.bright_black()
}

pub fn success(text: &str) -> ColoredString {
    text.green()
}

pub fn warning(text: &str) -> ColoredString {
    text.yellow()
}

pub fn err_line(text: &str) -> String {
    format!("{} {text}", "Error:".red().bold())
}

/// Section name padded for aligned TOC listings
pub fn section(name: &str) -> ColoredString {
    format!("{name:<10}").bright_magenta()
}

/// `start..end (n bytes)`; an inverted range from a damaged TOC reads as empty.
pub fn byte_range(start: u64, end: u64) -> ColoredString {
    format!("{start}..{end} ({} bytes)", end.saturating_sub(start)).bright_black()
}
