//! Explicit configuration passed into the explorer and the logging layer.
//!
//! Nothing here is read from a file or from global state; the CLI builds
//! these values from flags on every invocation.

use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

/// Default number of rows returned by `browse`.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default cap on rendered column width in text tables.
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Default cap on search matches.
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 100;

/// Behavioural settings for [`crate::app::Explorer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Rows per page when browsing without an explicit limit.
    pub page_size: usize,
    /// Maximum text-table column width before truncation.
    pub max_column_width: usize,
    /// Search result cap when the caller does not give one.
    pub max_search_results: usize,
    /// Delay before the single retry when the file is locked at open time.
    pub lock_retry_delay: Duration,
    /// Rows sampled per table for the size estimate.
    pub size_sample_rows: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            lock_retry_delay: Duration::from_millis(250),
            size_sample_rows: 1000,
        }
    }
}

impl ExplorerConfig {
    #[must_use]
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Level for a `-v` count: warn, info, debug, trace.
    #[must_use]
    pub fn from_verbosity(verbose: u8, json: bool) -> Self {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            level: level.into(),
            format: if json { "json" } else { "pretty" }.into(),
        }
    }

    /// Initialize the tracing subscriber on stderr.
    ///
    /// Stdout carries rendered data only, so logs never mix with exports.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_verbosity(0, false)
    }
}
