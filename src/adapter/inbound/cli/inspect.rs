//! Handlers for `info`, `tables`, and `schema`.

use tabled::{Table, Tabled};

use super::command::{DatabaseArgs, SchemaArgs};
use super::output;
use crate::app::Explorer;
use crate::config::ExplorerConfig;
use crate::domain::size::format_size;
use crate::domain::{total_rows, ColumnMeta, TableMeta, TableSummary, Value};
use crate::error::Result;
use crate::format::{self, json, markdown, OutputFormat};

const TOTAL_LABEL: &str = "--- TOTAL ---";

/// Execute the `info` command.
pub fn info(args: &DatabaseArgs, config: &ExplorerConfig) -> Result<()> {
    let format = args
        .format
        .ensure_one_of("info", &[OutputFormat::Text, OutputFormat::Json])?;
    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let info = explorer.info()?;
    explorer.close()?;

    if format == OutputFormat::Json {
        return output::data(&json::render_value(&info)?);
    }

    output::section("DATABASE INFO");
    output::field("Path", &info.path);
    output::field(
        "File size",
        format!("{} ({} bytes)", format_size(info.file_size as i64), info.file_size),
    );
    output::field("Modified", &info.modified);
    output::field("SQLite version", &info.sqlite_version);
    output::field("Encoding", &info.encoding);
    output::field("Journal mode", &info.journal_mode);
    output::field("Page size", info.page_size);
    output::field("Pages", info.page_count);
    output::field("Free pages", info.freelist_count);
    output::field("Tables", info.table_count);
    output::field("Indexes", info.index_count);
    output::field("Views", info.view_count);
    output::field("Triggers", info.trigger_count);
    Ok(())
}

/// Execute the `tables` command.
pub fn tables(args: &DatabaseArgs, config: &ExplorerConfig) -> Result<()> {
    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let tables = explorer.tables()?;
    explorer.close()?;

    match args.format {
        OutputFormat::Json => output::data(&json::render_value(&tables)?),
        OutputFormat::Csv => output::data(&format::csv::render(
            &table_headers(),
            &listing_rows(&tables),
        )),
        OutputFormat::Markdown => {
            let mut rows = listing_rows(&tables);
            rows.push(total_row(&tables));
            output::data(&markdown::render(&table_headers(), &rows))
        }
        OutputFormat::Text => {
            if tables.is_empty() {
                return output::data("(no tables found)");
            }
            let mut rows = listing_rows(&tables);
            rows.push(total_row(&tables));
            output::section("TABLES");
            output::data(&format::text::render(
                &table_headers(),
                &rows,
                config.max_column_width,
            ))
        }
    }
}

fn table_headers() -> Vec<String> {
    vec!["Table Name".into(), "Rows".into(), "Columns".into()]
}

fn listing_rows(tables: &[TableSummary]) -> Vec<Vec<Value>> {
    tables
        .iter()
        .map(|table| {
            vec![
                Value::from(table.name.as_str()),
                Value::Integer(table.row_count),
                Value::Integer(table.column_count as i64),
            ]
        })
        .collect()
}

fn total_row(tables: &[TableSummary]) -> Vec<Value> {
    vec![
        Value::from(TOTAL_LABEL),
        Value::Integer(total_rows(tables)),
        Value::from(""),
    ]
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "#")]
    cid: i64,
    #[tabled(rename = "Column")]
    name: String,
    #[tabled(rename = "Type")]
    declared_type: String,
    #[tabled(rename = "NotNull")]
    not_null: &'static str,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "PK")]
    primary_key: &'static str,
}

impl From<&ColumnMeta> for ColumnRow {
    fn from(column: &ColumnMeta) -> Self {
        Self {
            cid: column.cid,
            name: column.name.clone(),
            declared_type: column.declared_type.clone(),
            not_null: if column.nullable { "" } else { "YES" },
            default: column.default.clone().unwrap_or_default(),
            primary_key: if column.primary_key { "PK" } else { "" },
        }
    }
}

/// Execute the `schema` command.
pub fn schema(args: &SchemaArgs, config: &ExplorerConfig) -> Result<()> {
    let format = args.format.ensure_one_of(
        "schema",
        &[OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown],
    )?;
    let mut explorer = Explorer::with_config(&args.db, config.clone())?;
    let schemas = explorer.schema(args.table.as_deref())?;
    explorer.close()?;

    match format {
        OutputFormat::Json => output::data(&json::render_value(&schemas)?),
        OutputFormat::Markdown => {
            let sections: Vec<String> = schemas.iter().map(markdown_section).collect();
            output::data(&sections.join("\n\n"))
        }
        _ => {
            if schemas.is_empty() {
                return output::data("(no tables found)");
            }
            for (index, table) in schemas.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                print_table_schema(table);
            }
            Ok(())
        }
    }
}

fn print_table_schema(table: &TableMeta) {
    output::section(&format!("TABLE: {}  ({} rows)", table.name, table.row_count));
    let rows: Vec<ColumnRow> = table.columns.iter().map(ColumnRow::from).collect();
    output::lines(&Table::new(rows).to_string());

    if !table.indexes.is_empty() {
        println!();
        output::lines("Indexes:");
        for index in &table.indexes {
            let unique = if index.unique { " (UNIQUE)" } else { "" };
            output::lines(&format!(
                "  - {}{unique}: {}",
                index.name,
                index.columns.join(", ")
            ));
        }
    }

    if !table.foreign_keys.is_empty() {
        println!();
        output::lines("Foreign keys:");
        for key in &table.foreign_keys {
            output::lines(&format!(
                "  - {} -> {}.{}",
                key.from,
                key.table,
                key.to.as_deref().unwrap_or("(primary key)")
            ));
        }
    }

    if let Some(sql) = &table.create_sql {
        println!();
        output::lines("CREATE SQL:");
        for line in sql.lines() {
            output::lines(&format!("  {line}"));
        }
    }
}

fn markdown_section(table: &TableMeta) -> String {
    let columns: Vec<String> = ["#", "Column", "Type", "NotNull", "Default", "PK"]
        .into_iter()
        .map(String::from)
        .collect();
    let rows: Vec<Vec<Value>> = table
        .columns
        .iter()
        .map(|column| {
            let row = ColumnRow::from(column);
            vec![
                Value::Integer(row.cid),
                Value::from(row.name),
                Value::from(row.declared_type),
                Value::from(row.not_null),
                Value::from(row.default),
                Value::from(row.primary_key),
            ]
        })
        .collect();
    format!("### {}\n\n{}", table.name, markdown::render(&columns, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, rows: i64) -> TableSummary {
        TableSummary {
            name: name.into(),
            row_count: rows,
            column_count: 2,
        }
    }

    #[test]
    fn total_row_sums_listing() {
        let tables = vec![summary("a", 3), summary("b", 4)];
        let total = total_row(&tables);
        assert_eq!(total[0], Value::from(TOTAL_LABEL));
        assert_eq!(total[1], Value::Integer(7));
    }

    #[test]
    fn column_rows_flag_constraints() {
        let column = ColumnMeta {
            cid: 0,
            name: "id".into(),
            declared_type: "INTEGER".into(),
            nullable: false,
            default: None,
            primary_key: true,
        };
        let row = ColumnRow::from(&column);
        assert_eq!(row.not_null, "YES");
        assert_eq!(row.primary_key, "PK");
        assert_eq!(row.default, "");
    }

    #[test]
    fn markdown_schema_section() {
        let table = TableMeta {
            name: "t".into(),
            columns: vec![ColumnMeta {
                cid: 0,
                name: "x".into(),
                declared_type: "TEXT".into(),
                nullable: true,
                default: Some("'a'".into()),
                primary_key: false,
            }],
            row_count: 0,
            indexes: vec![],
            foreign_keys: vec![],
            create_sql: None,
        };
        let section = markdown_section(&table);
        assert!(section.starts_with("### t\n\n| # | Column | Type | NotNull | Default | PK |"));
        assert!(section.contains("| 0 | x | TEXT |  | 'a' |  |"));
    }
}
