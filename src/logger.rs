//! Console logging for the system monitor
//!
//! Every line carries a local wall-clock timestamp, since the monitor runs
//! for days under systemd and the journal is the only record of what the
//! display did.

use chrono::Local;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";
const RESET: &str = "\x1b[0m";
const GRAY: &str = "\x1b[90m";

/// Enable or disable `debug` output (from `debugging.enable_debug_logs`).
pub fn set_debug_enabled(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    fn colour_code(self) -> &'static str {
        match self {
            LogLevel::Info => "\x1b[36m",    // Cyan
            LogLevel::Success => "\x1b[32m", // Green
            LogLevel::Warning => "\x1b[33m", // Yellow
            LogLevel::Error => "\x1b[31m",   // Red
            LogLevel::Debug => GRAY,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            LogLevel::Info => "ℹ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "⚠",
            LogLevel::Error => "✗",
            LogLevel::Debug => "•",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "OK",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

fn format_line(timestamp: &str, level: LogLevel, message: impl Display) -> String {
    format!(
        "{GRAY}{timestamp}{RESET} {}{} {:<5}{RESET} {message}",
        level.colour_code(),
        level.symbol(),
        level.label(),
    )
}

fn log_message(level: LogLevel, message: impl Display) {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let line = format_line(&timestamp, level, message);
    match level {
        LogLevel::Error | LogLevel::Warning => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

/// Log a section header (major step in the process)
pub fn section(title: impl Display) {
    println!("\n\x1b[34m\x1b[1m▶ {title}{RESET}");
}

/// Log a subsection (minor step within a major step)
pub fn subsection(title: impl Display) {
    println!("  \x1b[36m→{RESET} {title}");
}

pub fn info(message: impl Display) {
    log_message(LogLevel::Info, message);
}

pub fn success(message: impl Display) {
    log_message(LogLevel::Success, message);
}

pub fn warning(message: impl Display) {
    log_message(LogLevel::Warning, message);
}

pub fn error(message: impl Display) {
    log_message(LogLevel::Error, message);
}

pub fn debug(message: impl Display) {
    if DEBUG_ENABLED.load(Ordering::Relaxed) {
        log_message(LogLevel::Debug, message);
    }
}

/// Log a configuration group header
pub fn config_group(title: impl Display) {
    println!("  \x1b[1m[{title}]{RESET}");
}

/// Log a key-value pair
pub fn kvp(key: impl Display, value: impl Display) {
    println!("  {GRAY}•{RESET} {key}: {value}");
}

/// Log an indented detail line (like a hint under an error)
pub fn detail(message: impl Display) {
    println!("    {GRAY}{message}{RESET}");
}

pub fn app_start(app_name: &str, version: &str) {
    println!("\n\x1b[1m{app_name} v{version}{RESET}");
    println!("{GRAY}{}{RESET}", "=".repeat(60));
}

pub fn app_end() {
    println!("\n{GRAY}{}{RESET}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_has_timestamp_symbol_and_padded_label() {
        let line = format_line("12:00:00.000", LogLevel::Success, "Display ready");
        assert_eq!(
            line,
            "\x1b[90m12:00:00.000\x1b[0m \x1b[32m✓ OK   \x1b[0m Display ready"
        );
    }

    #[test]
    fn error_line_is_red() {
        let line = format_line("00:00:01.500", LogLevel::Error, "SPI write failed");
        assert!(line.contains("\x1b[31m✗ ERROR"));
        assert!(line.ends_with("SPI write failed"));
    }
}
