/// ANSI color helper utilities for terminal output.
use ansi_term::Colour;

pub const RESET: &str = "\x1b[0m";
pub const GREY: &str = "\x1b[90m";

/// Points color:
/// \>0 → green
/// \<0 → red
/// 0 → plain
pub fn colorize_points(value: i64) -> String {
    let text = value.to_string();
    if value > 0 {
        Colour::Green.paint(text).to_string()
    } else if value < 0 {
        Colour::Red.paint(text).to_string()
    } else {
        text
    }
}

/// Withdrawal status color: pending yellow, approved green, rejected red.
pub fn colorize_status(status: &str) -> String {
    match status {
        "pending" => Colour::Yellow.paint(status).to_string(),
        "approved" => Colour::Green.paint(status).to_string(),
        "rejected" => Colour::Red.paint(status).to_string(),
        other => other.to_string(),
    }
}

pub fn colorize_in_out(value: &str, is_in: bool) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" {
        return format!("{GREY}{value}{RESET}");
    }

    if is_in {
        Colour::Green.paint(value).to_string()
    } else {
        Colour::Red.paint(value).to_string()
    }
}
