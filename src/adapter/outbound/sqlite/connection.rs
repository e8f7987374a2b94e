//! Opening, probing, and compacting database files.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use rusqlite::{Connection, ErrorCode, OpenFlags};
use tracing::{debug, info, warn};

use crate::domain::VacuumReport;
use crate::error::{Error, Result};

use super::sql_err;

const PROBE_SQL: &str = "SELECT COUNT(*) FROM sqlite_master";

/// How a handle may touch the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Inspection; the engine rejects every write.
    ReadOnly,
    /// Needed only for compaction.
    Writable,
}

/// An open connection plus the path it was opened from.
///
/// Never creates the file: opening a missing path fails with
/// [`Error::NotFound`].
#[derive(Debug)]
pub struct Handle {
    path: PathBuf,
    mode: AccessMode,
    conn: Connection,
}

impl Handle {
    /// Open `path` and verify it is a readable SQLite database.
    ///
    /// When the probe hits a lock, retries once after `retry_delay` before
    /// giving up with [`Error::Locked`].
    pub fn open(path: &Path, mode: AccessMode, retry_delay: Duration) -> Result<Self> {
        check_path(path)?;

        let flags = match mode {
            AccessMode::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
            AccessMode::Writable => OpenFlags::SQLITE_OPEN_READ_WRITE,
        } | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(path, flags).map_err(|err| open_error(path, err))?;

        match probe(&conn) {
            Ok(()) => {}
            Err(err) if is_lock(&err) => {
                warn!(
                    path = %path.display(),
                    delay_ms = retry_delay.as_millis() as u64,
                    "Database locked, retrying once"
                );
                thread::sleep(retry_delay);
                probe(&conn).map_err(|err| open_error(path, err))?;
            }
            Err(err) => return Err(open_error(path, err)),
        }

        debug!(path = %path.display(), ?mode, "Database opened");
        Ok(Self {
            path: path.to_path_buf(),
            mode,
            conn,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error the engine reports.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, err)| Error::sql(err, "close"))?;
        debug!(path = %path.display(), "Database closed");
        Ok(())
    }
}

/// Reject paths that cannot be a database file before asking the engine.
pub fn check_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::Validation("database path cannot be empty".into()));
    }
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(Error::NotADatabase {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Rebuild the file to drop free pages, reporting sizes before and after.
///
/// Opens its own writable connection so inspection handles stay read-only.
pub fn compact(path: &Path, retry_delay: Duration) -> Result<VacuumReport> {
    let before = file_size(path)?;
    let handle = Handle::open(path, AccessMode::Writable, retry_delay)?;
    handle
        .conn()
        .execute_batch("VACUUM")
        .map_err(sql_err("VACUUM"))?;
    handle.close()?;
    let after = file_size(path)?;

    let report = VacuumReport::new(before, after);
    info!(
        path = %path.display(),
        before,
        after,
        saved = report.saved_bytes,
        "Vacuum complete"
    );
    Ok(report)
}

pub(crate) fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)?.len())
}

fn probe(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row(PROBE_SQL, [], |row| row.get::<_, i64>(0))
        .map(|_| ())
}

fn is_lock(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

fn open_error(path: &Path, err: rusqlite::Error) -> Error {
    match err.sqlite_error_code() {
        Some(ErrorCode::NotADatabase) => Error::NotADatabase {
            path: path.to_path_buf(),
        },
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => Error::Locked {
            message: format!("{}: {err}", path.display()),
        },
        _ => Error::sql(err, PROBE_SQL),
    }
}
