//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

/// Appends a dimmed table header line.
pub fn push_header(output: &mut String, header: &str, use_colors: bool) {
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(header);
        output.push('\n');
    }
}

/// Formats a `Label: value` line with a bold label.
pub fn labeled(label: &str, value: &str, use_colors: bool) -> String {
    let label = format!("{label}:");
    if use_colors {
        format!("{:<12} {}\n", label.bold(), value)
    } else {
        format!("{label:<12} {value}\n")
    }
}

/// Formats a yes/no flag.
pub fn yes_no(flag: bool, use_colors: bool) -> String {
    match (flag, use_colors) {
        (true, true) => "yes".green().to_string(),
        (false, true) => "no".yellow().to_string(),
        (true, false) => "yes".to_string(),
        (false, false) => "no".to_string(),
    }
}
