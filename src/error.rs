//! Error types for the crate.
//!
//! Every failure surfaces as a single [`Error`] enum. Variants derive
//! [`miette::Diagnostic`] so the binary can render them with a stable code
//! and an optional help line.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Exit status for any handled error.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status when the operator interrupts the process (SIGINT).
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("database not found: {}", path.display())]
    #[diagnostic(code(sqlscope::not_found), help("check the path and try again"))]
    NotFound { path: PathBuf },

    #[error("not a valid SQLite database: {}", path.display())]
    #[diagnostic(code(sqlscope::not_a_database))]
    NotADatabase { path: PathBuf },

    #[error("database is locked: {message}")]
    #[diagnostic(
        code(sqlscope::locked),
        help("another process holds a lock on this file; retry later")
    )]
    Locked { message: String },

    #[error("table '{table}' not found")]
    #[diagnostic(code(sqlscope::table_not_found))]
    TableNotFound {
        table: String,
        suggestions: Vec<String>,
        #[help]
        help: Option<String>,
    },

    #[error("column '{column}' not found in table '{table}'")]
    #[diagnostic(code(sqlscope::column_not_found))]
    ColumnNotFound {
        table: String,
        column: String,
        #[help]
        help: Option<String>,
    },

    #[error("SQL error: {message}")]
    #[diagnostic(code(sqlscope::sql), help("statement: {statement}"))]
    Sql { message: String, statement: String },

    #[error("failed to write {}: {source}", path.display())]
    #[diagnostic(code(sqlscope::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    #[diagnostic(code(sqlscope::validation))]
    Validation(String),

    #[error("failed to open database {side} ({}): {source}", path.display())]
    #[diagnostic(code(sqlscope::diff))]
    DiffOpen {
        side: &'static str,
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(sqlscope::io))]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(sqlscope::json))]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::TableNotFound`] listing the closest available names.
    pub fn table_not_found(table: impl Into<String>, available: &[String]) -> Self {
        let table = table.into();
        let suggestions = suggest(&table, available);
        let help = if available.is_empty() {
            Some("the database has no tables".to_string())
        } else if suggestions.len() == available.len() {
            Some(format!("available tables: {}", suggestions.join(", ")))
        } else {
            Some(format!("did you mean: {}?", suggestions.join(", ")))
        };
        Error::TableNotFound {
            table,
            suggestions,
            help,
        }
    }

    /// Build a [`Error::ColumnNotFound`] listing the table's columns.
    pub fn column_not_found(
        table: impl Into<String>,
        column: impl Into<String>,
        available: &[String],
    ) -> Self {
        Error::ColumnNotFound {
            table: table.into(),
            column: column.into(),
            help: Some(format!("available columns: {}", available.join(", "))),
        }
    }

    /// Map an engine error, keeping the statement that produced it.
    pub fn sql(err: rusqlite::Error, statement: impl Into<String>) -> Self {
        use rusqlite::ErrorCode;

        if let rusqlite::Error::SqliteFailure(failure, _) = &err {
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) {
                return Error::Locked {
                    message: err.to_string(),
                };
            }
        }
        Error::Sql {
            message: err.to_string(),
            statement: statement.into(),
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

/// Names from `available` that look like `wanted`.
///
/// A candidate is close when either name is a case-insensitive prefix or
/// substring of the other. Falls back to every available name.
pub fn suggest(wanted: &str, available: &[String]) -> Vec<String> {
    let needle = wanted.to_lowercase();
    let close: Vec<String> = available
        .iter()
        .filter(|name| {
            let candidate = name.to_lowercase();
            !needle.is_empty()
                && (candidate.starts_with(&needle)
                    || needle.starts_with(&candidate)
                    || candidate.contains(&needle)
                    || needle.contains(&candidate))
        })
        .cloned()
        .collect();

    if close.is_empty() {
        available.to_vec()
    } else {
        close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn suggest_prefers_close_matches() {
        let available = names(&["orders", "user_roles", "users"]);
        assert_eq!(suggest("user", &available), names(&["user_roles", "users"]));
        assert_eq!(suggest("USERS", &available), names(&["users"]));
    }

    #[test]
    fn suggest_matches_when_wanted_is_longer() {
        let available = names(&["users"]);
        assert_eq!(suggest("users_old", &available), names(&["users"]));
    }

    #[test]
    fn suggest_falls_back_to_all_tables() {
        let available = names(&["orders", "users"]);
        assert_eq!(suggest("zzz", &available), available);
    }

    #[test]
    fn table_not_found_lists_suggestions_in_help() {
        let err = Error::table_not_found("usr", &names(&["orders", "users"]));
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("orders"));
        assert!(help.contains("users"));
        assert_eq!(err.to_string(), "table 'usr' not found");

        let err = Error::table_not_found("user", &names(&["orders", "users"]));
        match err {
            Error::TableNotFound {
                suggestions, help, ..
            } => {
                assert_eq!(suggestions, names(&["users"]));
                assert_eq!(help.as_deref(), Some("did you mean: users?"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn table_not_found_on_empty_database() {
        let err = Error::table_not_found("users", &[]);
        let help = err.help().map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("the database has no tables"));
    }

    #[test]
    fn busy_engine_errors_map_to_locked() {
        let failure = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY);
        let err = Error::sql(rusqlite::Error::SqliteFailure(failure, None), "SELECT 1");
        assert!(matches!(err, Error::Locked { .. }));
    }

    #[test]
    fn other_engine_errors_keep_statement() {
        let failure = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR);
        let err = Error::sql(
            rusqlite::Error::SqliteFailure(failure, Some("no such column: x".into())),
            "SELECT x FROM t",
        );
        match err {
            Error::Sql { message, statement } => {
                assert!(message.contains("no such column"));
                assert_eq!(statement, "SELECT x FROM t");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn every_error_exits_with_failure() {
        assert_eq!(Error::Validation("x".into()).exit_code(), EXIT_FAILURE);
    }
}
