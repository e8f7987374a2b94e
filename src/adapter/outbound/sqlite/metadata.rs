//! Catalog reads: table listing, column definitions, and database counters.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat};
use rusqlite::{Connection, OptionalExtension};

use crate::domain::{
    ColumnMeta, DatabaseInfo, ForeignKeyMeta, IndexMeta, TableMeta, TableSummary, Value,
};
use crate::domain::schema::UNTYPED;
use crate::error::{Error, Result};

use super::sql_err;

const TABLE_NAMES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name";
const TABLE_EXISTS_SQL: &str = "SELECT 1 FROM sqlite_master \
     WHERE type = 'table' AND name = ?1 AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'";
const OBJECT_COUNT_SQL: &str = "SELECT COUNT(*) FROM sqlite_master \
     WHERE type = ?1 AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'";
const CREATE_SQL: &str = "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1";
const TABLE_INFO_SQL: &str =
    "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)";
const INDEX_LIST_SQL: &str = "SELECT name, \"unique\" FROM pragma_index_list(?1) ORDER BY seq";
const INDEX_INFO_SQL: &str = "SELECT name FROM pragma_index_info(?1) ORDER BY seqno";
const FOREIGN_KEY_SQL: &str =
    "SELECT id, \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq";

/// Quote an identifier for interpolation into SQL.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// User table names, sorted. System tables (`sqlite_*`) are excluded.
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(TABLE_NAMES_SQL).map_err(sql_err(TABLE_NAMES_SQL))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .and_then(Iterator::collect)
        .map_err(sql_err(TABLE_NAMES_SQL))?;
    Ok(names)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found = conn
        .query_row(TABLE_EXISTS_SQL, [table], |_| Ok(()))
        .optional()
        .map_err(sql_err(TABLE_EXISTS_SQL))?;
    Ok(found.is_some())
}

/// Fail with [`Error::TableNotFound`] (with suggestions) unless `table` exists.
pub fn require_table(conn: &Connection, table: &str) -> Result<()> {
    if table_exists(conn, table)? {
        Ok(())
    } else {
        Err(Error::table_not_found(table, &table_names(conn)?))
    }
}

pub fn row_count(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(sql_err(&sql))
}

/// Column definitions in declaration order.
pub fn columns(conn: &Connection, table: &str) -> Result<Vec<ColumnMeta>> {
    let mut stmt = conn.prepare(TABLE_INFO_SQL).map_err(sql_err(TABLE_INFO_SQL))?;
    let columns = stmt
        .query_map([table], |row| {
            let declared: Option<String> = row.get(2)?;
            let default = Value::from(row.get_ref(4)?);
            Ok(ColumnMeta {
                cid: row.get(0)?,
                name: row.get(1)?,
                declared_type: match declared {
                    Some(declared) if !declared.trim().is_empty() => declared,
                    _ => UNTYPED.to_string(),
                },
                nullable: row.get::<_, i64>(3)? == 0,
                default: (!default.is_null()).then(|| default.to_string()),
                primary_key: row.get::<_, i64>(5)? > 0,
            })
        })
        .and_then(Iterator::collect)
        .map_err(sql_err(TABLE_INFO_SQL))?;
    Ok(columns)
}

/// Column names in declaration order.
pub fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    Ok(columns(conn, table)?
        .into_iter()
        .map(|column| column.name)
        .collect())
}

/// Tables with row and column counts.
pub fn list_tables(conn: &Connection) -> Result<Vec<TableSummary>> {
    table_names(conn)?
        .into_iter()
        .map(|name| -> Result<TableSummary> {
            Ok(TableSummary {
                row_count: row_count(conn, &name)?,
                column_count: columns(conn, &name)?.len(),
                name,
            })
        })
        .collect()
}

/// Full definitions for one table, or for every table when `table` is `None`.
pub fn get_schema(conn: &Connection, table: Option<&str>) -> Result<Vec<TableMeta>> {
    match table {
        Some(table) => {
            require_table(conn, table)?;
            Ok(vec![table_meta(conn, table)?])
        }
        None => table_names(conn)?
            .iter()
            .map(|name| table_meta(conn, name))
            .collect(),
    }
}

fn table_meta(conn: &Connection, table: &str) -> Result<TableMeta> {
    Ok(TableMeta {
        name: table.to_string(),
        columns: columns(conn, table)?,
        row_count: row_count(conn, table)?,
        indexes: indexes(conn, table)?,
        foreign_keys: foreign_keys(conn, table)?,
        create_sql: create_sql(conn, table)?,
    })
}

fn indexes(conn: &Connection, table: &str) -> Result<Vec<IndexMeta>> {
    let mut stmt = conn.prepare(INDEX_LIST_SQL).map_err(sql_err(INDEX_LIST_SQL))?;
    let listed: Vec<(String, bool)> = stmt
        .query_map([table], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? != 0)))
        .and_then(Iterator::collect)
        .map_err(sql_err(INDEX_LIST_SQL))?;

    let mut info = conn.prepare(INDEX_INFO_SQL).map_err(sql_err(INDEX_INFO_SQL))?;
    listed
        .into_iter()
        .map(|(name, unique)| -> Result<IndexMeta> {
            // Expression indexes have no column name.
            let columns = info
                .query_map([&name], |row| {
                    Ok(row
                        .get::<_, Option<String>>(0)?
                        .unwrap_or_else(|| "<expr>".to_string()))
                })
                .and_then(Iterator::collect)
                .map_err(sql_err(INDEX_INFO_SQL))?;
            Ok(IndexMeta {
                name,
                unique,
                columns,
            })
        })
        .collect()
}

fn foreign_keys(conn: &Connection, table: &str) -> Result<Vec<ForeignKeyMeta>> {
    let mut stmt = conn.prepare(FOREIGN_KEY_SQL).map_err(sql_err(FOREIGN_KEY_SQL))?;
    let keys = stmt
        .query_map([table], |row| {
            Ok(ForeignKeyMeta {
                id: row.get(0)?,
                from: row.get(1)?,
                table: row.get(2)?,
                to: row.get(3)?,
            })
        })
        .and_then(Iterator::collect)
        .map_err(sql_err(FOREIGN_KEY_SQL))?;
    Ok(keys)
}

fn create_sql(conn: &Connection, table: &str) -> Result<Option<String>> {
    let sql = conn
        .query_row(CREATE_SQL, [table], |row| row.get::<_, Option<String>>(0))
        .optional()
        .map_err(sql_err(CREATE_SQL))?;
    Ok(sql.flatten())
}

/// Integer-valued pragma. `name` must be a fixed pragma name, never user input.
pub(crate) fn pragma_i64(conn: &Connection, name: &str) -> Result<i64> {
    let sql = format!("PRAGMA {name}");
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(sql_err(&sql))
}

fn pragma_text(conn: &Connection, name: &str) -> Result<String> {
    let sql = format!("PRAGMA {name}");
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(sql_err(&sql))
}

fn object_count(conn: &Connection, kind: &str) -> Result<i64> {
    conn.query_row(OBJECT_COUNT_SQL, [kind], |row| row.get(0))
        .map_err(sql_err(OBJECT_COUNT_SQL))
}

/// Database-wide metadata for the file at `path`.
pub fn get_info(conn: &Connection, path: &Path) -> Result<DatabaseInfo> {
    let metadata = fs::metadata(path)?;
    let modified = metadata
        .modified()
        .map(|time| DateTime::<Local>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
    let display_path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    Ok(DatabaseInfo {
        path: display_path.display().to_string(),
        file_size: metadata.len(),
        modified,
        sqlite_version: conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))
            .map_err(sql_err("SELECT sqlite_version()"))?,
        encoding: pragma_text(conn, "encoding")?,
        journal_mode: pragma_text(conn, "journal_mode")?,
        page_size: pragma_i64(conn, "page_size")?,
        page_count: pragma_i64(conn, "page_count")?,
        freelist_count: pragma_i64(conn, "freelist_count")?,
        table_count: object_count(conn, "table")?,
        index_count: object_count(conn, "index")?,
        view_count: object_count(conn, "view")?,
        trigger_count: object_count(conn, "trigger")?,
    })
}
