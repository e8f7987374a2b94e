//! Row rendering for terminal, JSON, CSV, and Markdown output.
//!
//! All renderers are pure functions of their input and produce byte-identical
//! output for identical rows.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::RowSet;
use crate::error::{Error, Result};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Name accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "md",
        }
    }

    /// Fail with [`Error::Validation`] unless `self` is one of `allowed`.
    pub fn ensure_one_of(self, command: &str, allowed: &[OutputFormat]) -> Result<Self> {
        if allowed.contains(&self) {
            return Ok(self);
        }
        let names: Vec<&str> = allowed.iter().map(|format| format.as_str()).collect();
        Err(Error::Validation(format!(
            "{command} does not support --format {self} (expected one of: {})",
            names.join(", ")
        )))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            other => Err(format!(
                "unknown format '{other}' (expected text, json, csv, or md)"
            )),
        }
    }
}

/// Render a row set in the requested format.
pub fn render_rows(format: OutputFormat, rows: &RowSet, max_width: usize) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render(&rows.columns, &rows.rows, max_width)),
        OutputFormat::Json => json::render_rows(rows),
        OutputFormat::Csv => Ok(csv::render(&rows.columns, &rows.rows)),
        OutputFormat::Markdown => Ok(markdown::render(&rows.columns, &rows.rows)),
    }
}
