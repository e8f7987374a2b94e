//! Command-line interface definitions.
//!
//! Every command takes the database path first and its own `--format`.
//! Formats a command cannot render are rejected by the handler, not here,
//! so they exit with status 1 rather than clap's usage status 2.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::DEFAULT_MAX_COLUMN_WIDTH;
use crate::format::OutputFormat;

/// Inspect, query, and export SQLite databases
#[derive(Parser, Debug)]
#[command(name = "sqlscope")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// Hide hints and status lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Maximum column width in text tables
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_COLUMN_WIDTH)]
    pub max_width: usize,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show file and engine metadata
    Info(DatabaseArgs),

    /// List tables with row and column counts
    Tables(DatabaseArgs),

    /// Show column definitions, indexes, and foreign keys
    Schema(SchemaArgs),

    /// Page through the rows of a table
    Browse(BrowseArgs),

    /// Run a SQL statement on a read-only connection
    Query(QueryArgs),

    /// Export a table or query result as CSV, JSON, or Markdown
    Export(ExportArgs),

    /// Per-column statistics for a table
    Stats(StatsArgs),

    /// Search text columns across tables
    Search(SearchArgs),

    /// Page usage and estimated table sizes
    Size(DatabaseArgs),

    /// Compare tables, columns, and row counts of two databases
    Diff(DiffArgs),

    /// Preview or run compaction (requires --confirm to modify the file)
    Vacuum(VacuumArgs),
}

#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Path to the database file
    pub db: PathBuf,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Path to the database file
    pub db: PathBuf,

    /// Only this table
    pub table: Option<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Path to the database file
    pub db: PathBuf,

    pub table: String,

    /// Rows per page [default: 50]
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Raw SQL filter, inserted after WHERE
    #[arg(long = "where", value_name = "EXPR")]
    pub where_clause: Option<String>,

    /// Raw SQL ordering, inserted after ORDER BY
    #[arg(long, value_name = "EXPR")]
    pub order_by: Option<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path to the database file
    pub db: PathBuf,

    /// SQL to execute
    pub sql: String,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the database file
    pub db: PathBuf,

    /// Table to export (or use --query)
    pub table: Option<String>,

    /// Export the result of this SQL instead of a table
    #[arg(long, value_name = "SQL")]
    pub query: Option<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "csv")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Path to the database file
    pub db: PathBuf,

    pub table: String,

    /// Only these columns (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Path to the database file
    pub db: PathBuf,

    /// Case-insensitive text to look for
    pub term: String,

    /// Only these tables (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Maximum matches [default: 100]
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// First database (A)
    pub db_a: PathBuf,

    /// Second database (B)
    pub db_b: PathBuf,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct VacuumArgs {
    /// Path to the database file
    pub db: PathBuf,

    /// Actually rewrite the file; without this only a preview is shown
    #[arg(long)]
    pub confirm: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}
