//! Handlers for `browse`, `query`, and `export`.

use super::command::{BrowseArgs, ExportArgs, QueryArgs};
use super::output;
use crate::app::{ExportOutcome, ExportSource, Explorer};
use crate::config::ExplorerConfig;
use crate::domain::BrowseOptions;
use crate::error::{Error, Result};
use crate::format::{self, json, text, OutputFormat};

/// Query text shown in the title before it is cut.
const QUERY_TITLE_CHARS: usize = 60;

/// Execute the `browse` command.
pub fn browse(args: &BrowseArgs, config: &ExplorerConfig) -> Result<()> {
    let mut options = BrowseOptions::new(args.limit.unwrap_or(config.page_size)).offset(args.offset);
    options.where_clause = args.where_clause.clone();
    options.order_by = args.order_by.clone();

    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let page = explorer.browse(&args.table, &options)?;
    explorer.close()?;

    if args.format == OutputFormat::Json {
        return output::data(&json::render_value(&page)?);
    }
    if args.format == OutputFormat::Text {
        output::section(&format!("TABLE: {}  [{}]", page.table, page.showing()));
    }
    output::data(&format::render_rows(
        args.format,
        &page.data,
        config.max_column_width,
    )?)
}

/// Execute the `query` command.
pub fn query(args: &QueryArgs, config: &ExplorerConfig) -> Result<()> {
    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let rows = explorer.query(&args.sql)?;
    explorer.close()?;

    if args.format == OutputFormat::Text {
        let sql = args.sql.split_whitespace().collect::<Vec<_>>().join(" ");
        output::section(&format!(
            "QUERY: {}",
            text::truncate(&sql, QUERY_TITLE_CHARS)
        ));
    }
    output::data(&format::render_rows(
        args.format,
        &rows,
        config.max_column_width,
    )?)
}

/// Execute the `export` command.
pub fn export(args: &ExportArgs, config: &ExplorerConfig) -> Result<()> {
    let source = match (args.table.as_deref(), args.query.as_deref()) {
        (Some(table), None) => ExportSource::Table(table),
        (None, Some(sql)) => ExportSource::Query(sql),
        (Some(_), Some(_)) => {
            return Err(Error::Validation(
                "export takes either a table or --query, not both".into(),
            ))
        }
        (None, None) => {
            return Err(Error::Validation(
                "export needs a table name or --query".into(),
            ))
        }
    };

    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let outcome = explorer.export(source, args.format, args.output.as_deref())?;
    explorer.close()?;

    match outcome {
        ExportOutcome::Rendered(content) => output::data(&content),
        ExportOutcome::Written { path, bytes } => {
            output::success(&format!(
                "Exported {} to {}",
                match bytes {
                    1 => "1 byte".to_string(),
                    n => format!("{n} bytes"),
                },
                output::highlight(path.display())
            ));
            Ok(())
        }
    }
}
