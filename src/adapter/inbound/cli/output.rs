//! Astral-style CLI output formatting.
//!
//! Rendered data (tables, JSON, CSV, Markdown) goes to stdout through
//! [`data`] and is never styled, so piped output stays byte-exact. Report
//! lines (sections, fields, warnings) are styled when color is enabled.
//! Quiet mode drops hints, notes, and success lines.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;

use super::command::ColorChoice;
use crate::error::Result;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress hints, notes, and success lines.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

/// Global output configuration singleton.
static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_config(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig, color: ColorChoice) {
    write_config(config);
    owo_colors::set_override(color_enabled(color));
}

fn color_enabled(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    }
}

#[must_use]
pub fn is_quiet() -> bool {
    read_config().quiet
}

/// Write rendered data to stdout, adding a final newline when missing.
///
/// A closed pipe (`| head`) ends output quietly instead of failing.
pub fn data(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let result = if content.ends_with('\n') {
        stdout.write_all(content.as_bytes())
    } else {
        writeln!(stdout, "{content}")
    };
    match result.and_then(|()| stdout.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<16} {}", label.dimmed(), value);
}

/// Print a section header.
pub fn section(title: &str) {
    println!("{}", title.bold());
}

/// Print a success line.
pub fn success(message: &str) {
    if is_quiet() {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line.
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message);
}

/// Print a note.
pub fn note(message: &str) {
    if is_quiet() {
        return;
    }
    println!("  {}", message.dimmed());
}

/// Print a hint with "hint:" prefix (Astral-style).
pub fn hint(message: &str) {
    if is_quiet() {
        return;
    }
    println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
}

/// Print multiple lines of content, each indented.
pub fn lines(content: &str) {
    for line in content.lines() {
        println!("  {line}");
    }
}

/// Braille spinner animation frames (Astral-style).
const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a progress spinner on stderr. Hidden in quiet mode or off a terminal.
pub fn spinner(message: &str) -> indicatif::ProgressBar {
    if is_quiet() || !io::stderr().is_terminal() {
        let pb = indicatif::ProgressBar::hidden();
        pb.set_message(message.to_string());
        return pb;
    }

    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner()
        .tick_strings(BRAILLE_SPINNER)
        .template("  {spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success checkmark.
pub fn spinner_success(pb: &indicatif::ProgressBar, message: &str) {
    if is_quiet() || pb.is_hidden() {
        pb.finish_and_clear();
        return;
    }
    pb.finish_with_message(format!("{} {}", "✓".green(), message));
}

/// Finish a spinner with a failure mark.
pub fn spinner_fail(pb: &indicatif::ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
        return;
    }
    pb.finish_with_message(format!("{} {}", "×".red(), message));
}

/// Format a positive value in green.
pub fn positive(value: impl Display) -> String {
    format!("{}", value.to_string().green())
}

/// Format a negative value in red.
pub fn negative(value: impl Display) -> String {
    format!("{}", value.to_string().red())
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    format!("{}", value.to_string().cyan())
}
