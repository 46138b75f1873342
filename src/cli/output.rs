//! Terminal output helpers
//!
//! Data goes to stdout, diagnostics to stderr. `colored` honors NO_COLOR,
//! CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: impl Display) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: impl Display) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Green label, plain message.
pub fn action(label: &str, msg: impl Display) {
    println!("{}: {}", label.green(), msg);
}

pub fn header(msg: impl Display) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Two-space indented line under a header.
pub fn detail(msg: impl Display) {
    println!("  {}", msg);
}

/// Uncolored data line, safe to pipe.
pub fn info(msg: impl Display) {
    println!("{}", msg);
}

/// Dimmed secondary text, e.g. ids next to names.
pub fn dim(msg: &str) -> String {
    msg.dimmed().to_string()
}
