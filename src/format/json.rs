//! JSON rendering.

use serde::Serialize;

use crate::domain::{Record, RowSet};
use crate::error::Result;

/// Render rows as a pretty-printed array of objects keyed by column name.
pub fn render_rows(rows: &RowSet) -> Result<String> {
    let records: Vec<Record<'_>> = rows.records().collect();
    render_value(&records)
}

/// Render any report type with the same layout as row output.
pub fn render_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
