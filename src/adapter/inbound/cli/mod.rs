//! CLI module graph and command dispatch.

pub mod analyze;
pub mod command;
pub mod data;
pub mod inspect;
pub mod maintain;
pub mod output;

use tracing::debug;

use self::command::{Cli, Commands};
use crate::config::ExplorerConfig;
use crate::error::Result;

/// Run the parsed command line.
///
/// Output and logging must already be configured; this only builds the
/// explorer settings from the global flags and calls the handler.
pub fn execute(cli: &Cli) -> Result<()> {
    let config = ExplorerConfig::default().with_max_column_width(cli.max_width);
    debug!(command = ?cli.command, "Dispatching command");

    match &cli.command {
        Commands::Info(args) => inspect::info(args, &config),
        Commands::Tables(args) => inspect::tables(args, &config),
        Commands::Schema(args) => inspect::schema(args, &config),
        Commands::Browse(args) => data::browse(args, &config),
        Commands::Query(args) => data::query(args, &config),
        Commands::Export(args) => data::export(args, &config),
        Commands::Stats(args) => analyze::stats(args, &config),
        Commands::Search(args) => analyze::search(args, &config),
        Commands::Size(args) => analyze::size(args, &config),
        Commands::Diff(args) => maintain::diff(args, &config),
        Commands::Vacuum(args) => maintain::vacuum(args, &config),
    }
}
