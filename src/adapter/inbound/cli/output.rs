//! CLI output formatting.
//!
//! Human-readable output uses colored symbols; `--json` switches every
//! command to machine-readable JSON on stdout. Errors always go to stderr.

use std::fmt::Display;
use std::io::Write;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::json;

use crate::error::Error;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }

    /// Log level implied by `-q`/`-v`, if they override the configured one.
    #[must_use]
    pub const fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    *config_cell().read()
}

fn write_config(config: OutputConfig) {
    *config_cell().write() = config;
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    write_config(config);
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

#[must_use]
pub fn is_quiet() -> bool {
    read_config().quiet
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!("  {:<12} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line.
pub fn warning(message: &str) {
    if is_json() {
        return;
    }
    eprintln!("  {} {}", "⚠".yellow(), message);
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a note/hint.
pub fn note(message: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!("  {}", message.dimmed());
}

/// Print a rendered table.
pub fn table(rendered: impl Display) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!("{rendered}");
}

/// Print one generated fragment as it arrives.
///
/// Fragments are the command's result, so quiet mode still prints them.
pub fn fragment(text: &str) {
    if is_json() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

/// Emit a JSON value directly (for commands that need custom JSON output).
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

/// Stable kind and message for a failed command.
#[must_use]
pub fn describe(err: &Error) -> (&'static str, String) {
    match err {
        Error::Api(api) => (api.kind().as_str(), api.message().to_string()),
        Error::Config(e) => ("config", e.to_string()),
        Error::Io(e) => ("io", e.to_string()),
        other => ("internal", other.to_string()),
    }
}

/// Print a failed command as `error[<kind>]: <message>`.
pub fn failure(err: &Error) {
    let (kind, message) = describe(err);

    if is_json() {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "kind": kind, "message": message },
            })
        );
        return;
    }

    eprintln!("{}: {}", format!("error[{kind}]").red().bold(), message);
}
