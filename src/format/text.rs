//! Aligned plain-text tables.
//!
//! ```text
//! id | name
//! ---+------
//!  1 | Alice
//! (1 row)
//! ```

use crate::domain::Value;

const ELLIPSIS: &str = "...";
const COLUMN_SEPARATOR: &str = " | ";
const RULE_JOINT: &str = "-+-";

/// Render rows as an aligned table capped at `max_width` characters per column.
///
/// Numeric columns (every non-NULL cell is an integer or real) are
/// right-aligned, header included; everything else is left-aligned.
#[must_use]
pub fn render(columns: &[String], rows: &[Vec<Value>], max_width: usize) -> String {
    if columns.is_empty() {
        return "(no columns)".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..columns.len())
                .map(|index| row.get(index).map(display_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let widest = cells
                .iter()
                .map(|row| row[index].chars().count())
                .fold(header.chars().count(), usize::max);
            widest.min(max_width.max(1))
        })
        .collect();

    let numeric: Vec<bool> = (0..columns.len())
        .map(|index| is_numeric_column(rows, index))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(join_cells(columns.iter().map(String::as_str), &widths, &numeric));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(RULE_JOINT),
    );
    for row in &cells {
        lines.push(join_cells(row.iter().map(String::as_str), &widths, &numeric));
    }
    lines.push(row_count_label(rows.len()));

    lines.join("\n")
}

/// `(1 row)` / `(N rows)`.
#[must_use]
pub fn row_count_label(count: usize) -> String {
    if count == 1 {
        "(1 row)".to_string()
    } else {
        format!("({count} rows)")
    }
}

/// Cut `value` to `width` characters, ending in `...` when shortened.
#[must_use]
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= ELLIPSIS.len() {
        return value.chars().take(width).collect();
    }
    let mut out: String = value.chars().take(width - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

fn display_cell(value: &Value) -> String {
    match value {
        Value::Text(text) => text.replace('\n', "\\n").replace('\r', "\\r"),
        other => other.to_string(),
    }
}

fn is_numeric_column(rows: &[Vec<Value>], index: usize) -> bool {
    let mut seen = false;
    for value in rows.iter().filter_map(|row| row.get(index)) {
        match value {
            Value::Null => {}
            Value::Integer(_) | Value::Real(_) => seen = true,
            Value::Text(_) | Value::Blob(_) => return false,
        }
    }
    seen
}

fn join_cells<'a>(
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    numeric: &[bool],
) -> String {
    cells
        .zip(widths.iter().zip(numeric))
        .map(|(cell, (width, right))| {
            let cell = truncate(cell, *width);
            if *right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
}
