//! Running statements and paging through tables.

use rusqlite::{params, Connection, Params};
use tracing::debug;

use crate::domain::{BrowseOptions, Page, RowSet, Value};
use crate::error::{Error, Result};

use super::metadata::{quote_ident, require_table};
use super::sql_err;

/// Execute `sql` and collect every row as typed values.
///
/// Runs on whatever connection it is given; on a read-only handle any
/// write statement fails with [`Error::Sql`] and leaves the file untouched.
pub fn run(conn: &Connection, sql: &str) -> Result<RowSet> {
    if sql.trim().is_empty() {
        return Err(Error::Validation("query cannot be empty".into()));
    }
    debug!(sql, "Running query");
    fetch(conn, sql, [])
}

/// Every row of `table`.
pub fn table_rows(conn: &Connection, table: &str) -> Result<RowSet> {
    require_table(conn, table)?;
    fetch(conn, &format!("SELECT * FROM {}", quote_ident(table)), [])
}

/// One window of `table`, plus the total row count under the same filter.
pub fn browse(conn: &Connection, table: &str, options: &BrowseOptions) -> Result<Page> {
    require_table(conn, table)?;

    let mut filter = String::new();
    if let Some(clause) = options.where_clause.as_deref().filter(|c| !c.trim().is_empty()) {
        filter.push_str(" WHERE ");
        filter.push_str(clause);
    }

    let count_sql = format!("SELECT COUNT(*) FROM {}{filter}", quote_ident(table));
    let total_rows: i64 = conn
        .query_row(&count_sql, [], |row| row.get(0))
        .map_err(sql_err(&count_sql))?;

    let mut sql = format!("SELECT * FROM {}{filter}", quote_ident(table));
    if let Some(order) = options.order_by.as_deref().filter(|o| !o.trim().is_empty()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(order);
    }
    sql.push_str(" LIMIT ?1 OFFSET ?2");

    let data = fetch(conn, &sql, params![bound(options.limit), bound(options.offset)])?;
    debug!(table, rows = data.len(), total_rows, "Browsed table");

    Ok(Page {
        table: table.to_string(),
        data,
        total_rows,
        limit: options.limit,
        offset: options.offset,
    })
}

fn bound(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn fetch<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<RowSet> {
    let mut stmt = conn.prepare(sql).map_err(sql_err(sql))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = stmt.query(params).map_err(sql_err(sql))?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next().map_err(sql_err(sql))? {
        let values = (0..width)
            .map(|index| row.get_ref(index).map(Value::from))
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sql_err(sql))?;
        collected.push(values);
    }
    Ok(RowSet::new(columns, collected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER, avatar BLOB);
             INSERT INTO users (name, age, avatar) VALUES
                 ('Alice', 30, x'0102'),
                 ('Bob', 25, NULL),
                 ('Carol', 35, NULL),
                 ('Dave', 40, NULL),
                 ('Eve', NULL, NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn run_keeps_column_order_and_types() {
        let conn = fixture();
        let rows = run(&conn, "SELECT name, age, avatar, 1.5 AS r FROM users WHERE id = 1").unwrap();
        assert_eq!(rows.columns, vec!["name", "age", "avatar", "r"]);
        assert_eq!(
            rows.rows[0],
            vec![
                Value::from("Alice"),
                Value::Integer(30),
                Value::Blob(vec![1, 2]),
                Value::Real(1.5)
            ]
        );
    }

    #[test]
    fn run_reports_statement_on_error() {
        let conn = fixture();
        match run(&conn, "SELECT nope FROM users").unwrap_err() {
            Error::Sql { statement, .. } => assert_eq!(statement, "SELECT nope FROM users"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(run(&conn, "  ").unwrap_err(), Error::Validation(_)));
    }

    #[test]
    fn empty_result_still_has_columns() {
        let conn = fixture();
        let rows = run(&conn, "SELECT id, name FROM users WHERE id < 0").unwrap();
        assert!(rows.is_empty());
        assert_eq!(rows.columns, vec!["id", "name"]);
    }

    #[test]
    fn browse_pages_in_rowid_order() {
        let conn = fixture();
        let page = browse(&conn, "users", &BrowseOptions::new(2).offset(1)).unwrap();
        assert_eq!(page.total_rows, 5);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data.rows[0][1], Value::from("Bob"));
        assert_eq!(page.data.rows[1][1], Value::from("Carol"));
        assert_eq!(page.showing(), "2-3 of 5");
    }

    #[test]
    fn browse_total_respects_filter() {
        let conn = fixture();
        let options = BrowseOptions::new(10)
            .where_clause("age > 28")
            .order_by("age DESC");
        let page = browse(&conn, "users", &options).unwrap();
        assert_eq!(page.total_rows, 3);
        assert_eq!(page.data.rows[0][1], Value::from("Dave"));
    }

    #[test]
    fn browse_past_the_end_is_empty() {
        let conn = fixture();
        let page = browse(&conn, "users", &BrowseOptions::new(10).offset(50)).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_rows, 5);
    }

    #[test]
    fn browse_unknown_table() {
        let conn = fixture();
        let err = browse(&conn, "usr", &BrowseOptions::new(1)).unwrap_err();
        assert!(matches!(err, Error::TableNotFound { .. }));
    }

    #[test]
    fn table_rows_returns_everything() {
        let conn = fixture();
        assert_eq!(table_rows(&conn, "users").unwrap().len(), 5);
    }
}
