//! Terminal output helpers - ASCII only, no emojis.

use owo_colors::OwoColorize;

pub fn success(message: &str) {
    println!("[OK] {}", message.green());
}

pub fn warning(message: &str) {
    println!("[WARNING] {}", message.yellow());
}

pub fn error(message: &str) {
    eprintln!("[ERROR] {}", message.red());
}

/// Checkbox mark for a step's completion flag.
pub fn completion_mark(completed: bool) -> String {
    if completed {
        "[x]".green().to_string()
    } else {
        "[ ]".dimmed().to_string()
    }
}
