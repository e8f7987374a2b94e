//! SQLite adapters.
//!
//! Thin functions over a [`rusqlite::Connection`]: opening and probing the
//! file, reading the catalog, running user SQL, and computing analytics.
//! Nothing here caches; every call reads the engine afresh.

pub mod analytics;
pub mod connection;
pub mod metadata;
pub mod query;

pub use connection::{AccessMode, Handle};

use crate::error::Error;

/// Map an engine error to [`Error::Sql`] (or [`Error::Locked`]) for `statement`.
pub(crate) fn sql_err(statement: &str) -> impl FnOnce(rusqlite::Error) -> Error + '_ {
    move |err| Error::sql(err, statement)
}
