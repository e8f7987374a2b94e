//! GitHub-flavored Markdown tables.

use crate::domain::Value;

/// Render a pipe table: header, `---` separator row, then data rows.
#[must_use]
pub fn render(columns: &[String], rows: &[Vec<Value>]) -> String {
    if columns.is_empty() {
        return "(no columns)".to_string();
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pipe_row(columns.iter().map(|name| escape(name))));
    lines.push(pipe_row(columns.iter().map(|_| "---".to_string())));
    for row in rows {
        lines.push(pipe_row(
            (0..columns.len()).map(|index| row.get(index).map(cell).unwrap_or_default()),
        ));
    }
    lines.join("\n")
}

fn cell(value: &Value) -> String {
    match value {
        Value::Blob(bytes) => format!("`{}`", Value::blob_placeholder(bytes.len())),
        other => escape(&other.to_string()),
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

fn pipe_row(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}
