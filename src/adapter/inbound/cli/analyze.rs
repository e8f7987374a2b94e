//! Handlers for `stats`, `search`, and `size`.

use super::command::{DatabaseArgs, SearchArgs, StatsArgs};
use super::output;
use crate::app::Explorer;
use crate::config::ExplorerConfig;
use crate::domain::size::format_size;
use crate::domain::{ColumnStats, SearchMatch, SizeReport, Value};
use crate::error::Result;
use crate::format::{self, json, text, OutputFormat};

/// Values longer than this are cut in search listings.
const SEARCH_VALUE_CHARS: usize = 80;

/// Execute the `stats` command.
pub fn stats(args: &StatsArgs, config: &ExplorerConfig) -> Result<()> {
    let columns = (!args.columns.is_empty()).then_some(args.columns.as_slice());

    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let stats = explorer.stats(&args.table, columns)?;
    explorer.close()?;

    if args.format == OutputFormat::Json {
        return output::data(&json::render_value(&stats)?);
    }
    let headers: Vec<String> = [
        "Column", "Type", "Non-Null", "Null", "Null%", "Distinct", "Min", "Max", "Avg",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    let rows: Vec<Vec<Value>> = stats.iter().map(stats_row).collect();

    match args.format {
        OutputFormat::Csv => output::data(&format::csv::render(&headers, &rows)),
        OutputFormat::Markdown => output::data(&format::markdown::render(&headers, &rows)),
        _ => {
            output::section(&format!("STATS: {}", args.table));
            output::data(&text::render(&headers, &rows, config.max_column_width))
        }
    }
}

fn stats_row(stats: &ColumnStats) -> Vec<Value> {
    let blank = || Value::from("");
    vec![
        Value::from(stats.column.as_str()),
        Value::from(stats.declared_type.as_str()),
        Value::Integer(stats.non_null),
        Value::Integer(stats.null_count),
        Value::Real(stats.null_pct),
        Value::Integer(stats.distinct),
        stats.min.clone().unwrap_or_else(blank),
        stats.max.clone().unwrap_or_else(blank),
        stats.avg_display().map_or_else(blank, Value::from),
    ]
}

/// Execute the `search` command.
pub fn search(args: &SearchArgs, config: &ExplorerConfig) -> Result<()> {
    let format = args
        .format
        .ensure_one_of("search", &[OutputFormat::Text, OutputFormat::Json])?;
    let tables = (!args.tables.is_empty()).then_some(args.tables.as_slice());

    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let matches = explorer.search(&args.term, tables, args.limit)?;
    explorer.close()?;

    if format == OutputFormat::Json {
        return output::data(&json::render_value(&matches)?);
    }
    if matches.is_empty() {
        return output::data(&format!("No matches found for \"{}\"", args.term));
    }
    output::section(&format!(
        "SEARCH: \"{}\"  ({})",
        args.term,
        match_count(matches.len())
    ));
    output::data(&render_matches(&matches))
}

fn match_count(count: usize) -> String {
    if count == 1 {
        "1 match".to_string()
    } else {
        format!("{count} matches")
    }
}

fn render_matches(matches: &[SearchMatch]) -> String {
    let mut lines = Vec::new();
    for (number, hit) in matches.iter().enumerate() {
        if number > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "--- Match {} [{}] (columns: {}) ---",
            number + 1,
            hit.table,
            hit.matched_columns.join(", ")
        ));
        for (column, value) in &hit.row {
            let shown = match value {
                Value::Text(text) => {
                    text::truncate(&text.replace('\n', "\\n"), SEARCH_VALUE_CHARS)
                }
                other => other.to_string(),
            };
            let marker = if hit.is_match(column) { " <<" } else { "" };
            lines.push(format!("  {column}: {shown}{marker}"));
        }
    }
    lines.push(String::new());
    lines.push(format!("({})", match_count(matches.len())));
    lines.join("\n")
}

/// Execute the `size` command.
pub fn size(args: &DatabaseArgs, config: &ExplorerConfig) -> Result<()> {
    let format = args
        .format
        .ensure_one_of("size", &[OutputFormat::Text, OutputFormat::Json])?;
    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let report = explorer.size()?;
    explorer.close()?;

    if format == OutputFormat::Json {
        return output::data(&json::render_value(&report)?);
    }
    print_size(&report, config.max_column_width)
}

fn print_size(report: &SizeReport, max_width: usize) -> Result<()> {
    output::section("SIZE ANALYSIS");
    output::field("File size", format_size(report.file_size as i64));
    output::field(
        "Used space",
        format!("{} ({} pages)", format_size(report.used_bytes), report.used_pages),
    );
    output::field(
        "Free space",
        format!(
            "{} ({} pages, {:.1}%)",
            format_size(report.free_bytes),
            report.free_pages,
            report.free_pct
        ),
    );
    output::field("Page size", format_size(report.page_size));

    if report.tables.is_empty() {
        output::note("(no tables)");
    } else {
        let headers: Vec<String> = ["Table", "Rows", "Columns", "Est. Size"]
            .into_iter()
            .map(String::from)
            .collect();
        let rows: Vec<Vec<Value>> = report
            .tables
            .iter()
            .map(|table| {
                vec![
                    Value::from(table.table.as_str()),
                    Value::Integer(table.rows),
                    Value::Integer(table.columns as i64),
                    Value::from(format_size(table.estimated_bytes as i64)),
                ]
            })
            .collect();
        println!();
        output::section("TABLE SIZES (estimated)");
        output::data(&text::render(&headers, &rows, max_width))?;
    }

    if report.free_pages > 0 {
        println!();
        output::warning(&format!(
            "{} of free space detected",
            format_size(report.free_bytes)
        ));
        output::hint(&format!(
            "run {} to reclaim it",
            output::highlight("sqlscope vacuum --confirm <db>")
        ));
    }
    Ok(())
}
