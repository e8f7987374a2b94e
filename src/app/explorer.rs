//! The `Explorer` façade: one database file, opened lazily, read-only.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::adapter::outbound::sqlite::{analytics, connection, metadata, query};
use crate::adapter::outbound::sqlite::{AccessMode, Handle};
use crate::config::ExplorerConfig;
use crate::domain::{
    BrowseOptions, ColumnStats, DatabaseInfo, DiffResult, Page, RowSet, SearchMatch, SizeReport,
    TableMeta, TableSummary, VacuumOutcome,
};
use crate::error::{Error, Result};
use crate::format::{self, OutputFormat};

/// Where `export` reads its rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSource<'a> {
    Table(&'a str),
    Query(&'a str),
}

/// Result of `export`: the rendered text, or where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Rendered(String),
    Written { path: PathBuf, bytes: usize },
}

/// Inspection entry point for a single database file.
///
/// The connection is opened read-only on the first operation and released
/// on [`Explorer::close`] or drop. Only [`Explorer::vacuum`] with
/// confirmation ever writes to the file, through a separate handle.
#[derive(Debug)]
pub struct Explorer {
    path: PathBuf,
    config: ExplorerConfig,
    handle: Option<Handle>,
}

impl Explorer {
    /// Explorer with default settings. Fails with [`Error::NotFound`] for a missing path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, ExplorerConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: ExplorerConfig) -> Result<Self> {
        let path = path.as_ref();
        connection::check_path(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            config,
            handle: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Release the connection if one is open.
    pub fn close(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.close(),
            None => Ok(()),
        }
    }

    fn conn(&mut self) -> Result<&Connection> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => Handle::open(&self.path, AccessMode::ReadOnly, self.config.lock_retry_delay)?,
        };
        Ok(self.handle.insert(handle).conn())
    }

    pub fn info(&mut self) -> Result<DatabaseInfo> {
        let path = self.path.clone();
        metadata::get_info(self.conn()?, &path)
    }

    pub fn tables(&mut self) -> Result<Vec<TableSummary>> {
        metadata::list_tables(self.conn()?)
    }

    /// Definition of `table`, or of every table when `None`.
    pub fn schema(&mut self, table: Option<&str>) -> Result<Vec<TableMeta>> {
        metadata::get_schema(self.conn()?, table)
    }

    pub fn browse(&mut self, table: &str, options: &BrowseOptions) -> Result<Page> {
        query::browse(self.conn()?, table, options)
    }

    /// Run `sql` verbatim on the read-only connection.
    pub fn query(&mut self, sql: &str) -> Result<RowSet> {
        query::run(self.conn()?, sql)
    }

    pub fn stats(&mut self, table: &str, columns: Option<&[String]>) -> Result<Vec<ColumnStats>> {
        analytics::column_stats(self.conn()?, table, columns)
    }

    /// Search textual columns; `limit` defaults to `max_search_results`.
    pub fn search(
        &mut self,
        term: &str,
        tables: Option<&[String]>,
        limit: Option<usize>,
    ) -> Result<Vec<SearchMatch>> {
        let limit = limit.unwrap_or(self.config.max_search_results);
        analytics::search(self.conn()?, term, tables, limit)
    }

    pub fn size(&mut self) -> Result<SizeReport> {
        let path = self.path.clone();
        let sample_rows = self.config.size_sample_rows;
        analytics::size_report(self.conn()?, &path, sample_rows)
    }

    /// Preview compaction, or run it when `confirm` is set.
    ///
    /// The preview never touches the file. Confirmed compaction closes the
    /// read-only connection first and compacts through a writable one.
    pub fn vacuum(&mut self, confirm: bool) -> Result<VacuumOutcome> {
        if !confirm {
            let path = self.path.clone();
            return analytics::vacuum_preview(self.conn()?, &path).map(VacuumOutcome::Preview);
        }
        self.close()?;
        connection::compact(&self.path, self.config.lock_retry_delay).map(VacuumOutcome::Completed)
    }

    /// Render a whole table or query result as CSV, JSON, or Markdown.
    ///
    /// With `output`, parent directories are created and the text is written
    /// there; otherwise it is returned.
    pub fn export(
        &mut self,
        source: ExportSource<'_>,
        format: OutputFormat,
        output: Option<&Path>,
    ) -> Result<ExportOutcome> {
        let format = format.ensure_one_of(
            "export",
            &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Markdown],
        )?;
        let rows = match source {
            ExportSource::Table(table) => query::table_rows(self.conn()?, table)?,
            ExportSource::Query(sql) => query::run(self.conn()?, sql)?,
        };
        let rendered = format::render_rows(format, &rows, self.config.max_column_width)?;

        let Some(path) = output else {
            debug!(rows = rows.len(), %format, "Export rendered");
            return Ok(ExportOutcome::Rendered(rendered));
        };
        write_export(path, &rendered)?;
        info!(path = %path.display(), rows = rows.len(), %format, "Export written");
        Ok(ExportOutcome::Written {
            path: path.to_path_buf(),
            bytes: rendered.len(),
        })
    }
}

fn write_export(path: &Path, content: &str) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, content).map_err(write_error)
}

/// Compare two database files by tables, columns, declared types, and row counts.
///
/// Opens one read-only handle per side; if either fails to open, the error
/// names the side.
pub fn diff(path_a: &Path, path_b: &Path, config: &ExplorerConfig) -> Result<DiffResult> {
    let a = open_side("A", path_a, config)?;
    let b = open_side("B", path_b, config)?;
    analytics::diff(
        a.conn(),
        &path_a.display().to_string(),
        b.conn(),
        &path_b.display().to_string(),
    )
}

fn open_side(side: &'static str, path: &Path, config: &ExplorerConfig) -> Result<Handle> {
    Handle::open(path, AccessMode::ReadOnly, config.lock_retry_delay).map_err(|source| {
        Error::DiffOpen {
            side,
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    })
}
