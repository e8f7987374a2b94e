//! sqlscope - inspect, query, and export SQLite databases.
//!
//! The library wraps a single database file in an [`app::Explorer`] that
//! opens a read-only connection on first use. Only a confirmed vacuum
//! writes to the file, through a separate connection.
//!
//! # Modules
//!
//! - [`domain`] - Engine-agnostic snapshots: values, row sets, schema, stats
//! - [`format`] - Text table, JSON, CSV, and Markdown renderers
//! - [`adapter::outbound::sqlite`] - Catalog reads, queries, and analytics over `rusqlite`
//! - [`adapter::inbound::cli`] - The `sqlscope` command line
//! - [`app`] - The `Explorer` façade and two-database diff
//! - [`config`] - Explorer and logging settings
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use sqlscope::app::Explorer;
//! use sqlscope::domain::BrowseOptions;
//!
//! let mut explorer = Explorer::open("app.db")?;
//! for table in explorer.tables()? {
//!     println!("{}: {} rows", table.name, table.row_count);
//! }
//! let page = explorer.browse("users", &BrowseOptions::new(10))?;
//! println!("{}", page.showing());
//! # Ok::<(), sqlscope::error::Error>(())
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
