//! Explorer façade integration tests.

mod support;

use anyhow::Result;
use serde_json::json;
use sqlscope::app::{self, ExportOutcome, ExportSource, Explorer};
use sqlscope::config::ExplorerConfig;
use sqlscope::domain::{total_rows, BrowseOptions, Value, VacuumOutcome};
use sqlscope::error::Error;
use sqlscope::format::OutputFormat;
use support::{parse_csv, TempDb};

#[test]
fn table_listing_total_matches_row_counts() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    let tables = explorer.tables()?;
    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["files", "orders", "users"]);
    assert_eq!(total_rows(&tables), 9);

    for table in &tables {
        let count = explorer.query(&format!("SELECT COUNT(*) FROM \"{}\"", table.name))?;
        assert_eq!(count.rows[0][0], Value::Integer(table.row_count));
    }
    Ok(())
}

#[test]
fn column_stats_account_for_every_row() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    for table in explorer.tables()? {
        for stats in explorer.stats(&table.name, None)? {
            assert_eq!(stats.non_null + stats.null_count, stats.total_rows);
            let expected = if stats.total_rows == 0 {
                0.0
            } else {
                (stats.null_count as f64 / stats.total_rows as f64 * 1000.0).round() / 10.0
            };
            assert_eq!(stats.null_pct, expected, "{}.{}", table.name, stats.column);
        }
    }
    Ok(())
}

#[test]
fn age_statistics_for_sample_users() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    let stats = explorer.stats("users", Some(["age".to_string()].as_slice()))?;
    let age = &stats[0];
    assert_eq!(age.null_count, 1);
    assert_eq!(age.null_pct, 20.0);
    assert_eq!(age.avg, Some(31.25));
    assert_eq!(age.min, Some(Value::Integer(25)));
    assert_eq!(age.max, Some(Value::Integer(35)));

    let email = explorer.stats("users", Some(["email".to_string()].as_slice()))?;
    assert!(email[0].avg.is_none());
    Ok(())
}

#[test]
fn browse_returns_requested_window() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    let page = explorer.browse("users", &BrowseOptions::new(2).offset(1))?;
    let ids: Vec<&Value> = page.data.rows.iter().map(|row| &row[0]).collect();
    assert_eq!(ids, vec![&Value::Integer(2), &Value::Integer(3)]);
    assert_eq!(page.total_rows, 5);
    assert_eq!(page.showing(), "2-3 of 5");
    Ok(())
}

#[test]
fn search_only_reports_real_matches() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    let matches = explorer.search("alice", None, None)?;
    assert_eq!(matches.len(), 2);
    for hit in &matches {
        assert!(!hit.matched_columns.is_empty());
        for column in &hit.matched_columns {
            let text = hit
                .get(column)
                .and_then(Value::searchable_text)
                .unwrap_or_default();
            assert!(text.contains("alice"), "{}.{column} = {text}", hit.table);
        }
    }

    assert!(explorer.search("", None, None)?.is_empty());
    assert!(explorer.search("no such text", None, None)?.is_empty());
    assert_eq!(explorer.search("example.com", None, Some(1))?.len(), 1);
    Ok(())
}

#[test]
fn csv_export_round_trips() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    let ExportOutcome::Rendered(csv) =
        explorer.export(ExportSource::Table("orders"), OutputFormat::Csv, None)?
    else {
        panic!("expected rendered output");
    };
    let records = parse_csv(&csv);
    let rows = explorer.query("SELECT * FROM orders")?;

    assert_eq!(records[0], rows.columns);
    assert_eq!(records.len() - 1, rows.len());
    for (record, row) in records[1..].iter().zip(&rows.rows) {
        let expected: Vec<String> = row
            .iter()
            .map(|value| match value {
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(record, &expected);
    }
    Ok(())
}

#[test]
fn json_export_round_trips() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    let ExportOutcome::Rendered(users) = explorer.export(
        ExportSource::Query("SELECT id, age, email FROM users WHERE id IN (1, 5)"),
        OutputFormat::Json,
        None,
    )?
    else {
        panic!("expected rendered output");
    };
    let parsed: serde_json::Value = serde_json::from_str(&users)?;
    assert_eq!(
        parsed,
        json!([
            {"id": 1, "age": 30, "email": "alice@example.com"},
            {"id": 5, "age": null, "email": null},
        ])
    );

    let ExportOutcome::Rendered(files) =
        explorer.export(ExportSource::Table("files"), OutputFormat::Json, None)?
    else {
        panic!("expected rendered output");
    };
    let parsed: serde_json::Value = serde_json::from_str(&files)?;
    assert_eq!(parsed[0]["data"], json!("<BLOB 4 bytes>"));
    Ok(())
}

#[test]
fn export_to_file_creates_parent_directories() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;
    let target = db.dir().join("exports/users.md");

    let outcome = explorer.export(
        ExportSource::Table("users"),
        OutputFormat::Markdown,
        Some(&target),
    )?;
    let written = std::fs::read_to_string(&target)?;
    assert!(written.starts_with("| id | name | age | email |\n| --- | --- | --- | --- |"));
    assert!(matches!(outcome, ExportOutcome::Written { bytes, .. } if bytes == written.len()));
    Ok(())
}

#[test]
fn diff_of_a_database_with_itself_is_identical() -> Result<()> {
    let db = TempDb::sample()?;
    let result = app::diff(db.path(), db.path(), &ExplorerConfig::default())?;
    assert!(result.is_identical());
    assert_eq!(result.common_tables, 3);
    Ok(())
}

#[test]
fn diff_reports_schema_drift() -> Result<()> {
    let a = TempDb::sample()?;
    let b = TempDb::sample()?;
    b.execute(
        "ALTER TABLE users ADD COLUMN phone TEXT;
         DELETE FROM orders WHERE id = 3;
         DROP TABLE files;",
    )?;

    let result = app::diff(a.path(), b.path(), &ExplorerConfig::default())?;
    assert!(!result.is_identical());
    assert_eq!(result.tables_only_in_a, vec!["files"]);
    assert!(result.tables_only_in_b.is_empty());

    let users = result
        .table_differences
        .iter()
        .find(|diff| diff.table == "users")
        .expect("users differs");
    assert_eq!(users.columns_only_in_b, vec!["phone"]);

    let orders = result
        .table_differences
        .iter()
        .find(|diff| diff.table == "orders")
        .expect("orders differs");
    assert_eq!(orders.row_diff, 1);
    Ok(())
}

#[test]
fn vacuum_preview_leaves_file_untouched() -> Result<()> {
    let db = TempDb::fragmented()?;
    let before = db.bytes()?;

    let mut explorer = Explorer::open(db.path())?;
    let VacuumOutcome::Preview(preview) = explorer.vacuum(false)? else {
        panic!("expected a preview");
    };
    explorer.close()?;

    assert!(preview.free_pages > 0);
    assert_eq!(preview.current_size, before.len() as u64);
    assert_eq!(db.bytes()?, before);
    Ok(())
}

#[test]
fn confirmed_vacuum_shrinks_fragmented_file() -> Result<()> {
    let db = TempDb::fragmented()?;
    let mut explorer = Explorer::open(db.path())?;

    let VacuumOutcome::Completed(report) = explorer.vacuum(true)? else {
        panic!("expected a completed vacuum");
    };
    assert!(report.after_size < report.before_size);
    assert_eq!(report.after_size, db.bytes()?.len() as u64);

    // The explorer keeps working after compaction.
    assert_eq!(explorer.tables()?.len(), 3);
    Ok(())
}

#[test]
fn size_report_accounts_for_every_page() -> Result<()> {
    let db = TempDb::fragmented()?;
    let mut explorer = Explorer::open(db.path())?;

    let report = explorer.size()?;
    assert_eq!(report.used_pages + report.free_pages, report.page_count);
    assert_eq!(report.free_bytes, report.free_pages * report.page_size);
    assert!(report.tables.iter().all(|t| t.estimated));
    let files = report.tables.iter().find(|t| t.table == "files").expect("files");
    // 8 (id) + 8 (name) + 4 (data)
    assert_eq!(files.estimated_bytes, 20);
    Ok(())
}

#[test]
fn missing_table_suggests_close_names() -> Result<()> {
    let db = TempDb::sample()?;
    let mut explorer = Explorer::open(db.path())?;

    match explorer.schema(Some("user")) {
        Err(Error::TableNotFound { suggestions, .. }) => assert_eq!(suggestions, vec!["users"]),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn writes_are_rejected_and_file_is_unchanged() -> Result<()> {
    let db = TempDb::sample()?;
    let before = db.bytes()?;
    let mut explorer = Explorer::open(db.path())?;

    let err = explorer.query("UPDATE users SET age = 99").unwrap_err();
    assert!(matches!(err, Error::Sql { .. }), "{err:?}");
    explorer.close()?;
    assert_eq!(db.bytes()?, before);
    Ok(())
}

#[test]
fn non_database_file_fails_on_first_operation() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "this is not a database, just some text that is long enough".repeat(100))?;

    let mut explorer = Explorer::open(&path)?;
    let err = explorer.tables().unwrap_err();
    assert!(matches!(err, Error::NotADatabase { .. }), "{err:?}");
    Ok(())
}

#[test]
fn empty_database_has_no_tables() -> Result<()> {
    let db = TempDb::empty()?;
    let mut explorer = Explorer::open(db.path())?;
    assert!(explorer.tables()?.is_empty());
    assert!(explorer.search("x", None, None)?.is_empty());
    assert_eq!(explorer.info()?.table_count, 0);
    Ok(())
}

#[test]
fn locked_database_reports_locked() -> Result<()> {
    let db = TempDb::sample()?;
    let writer = rusqlite::Connection::open(db.path())?;
    writer.execute_batch("BEGIN EXCLUSIVE; INSERT INTO users (name) VALUES ('held');")?;

    let mut explorer = Explorer::open(db.path())?;
    match explorer.tables() {
        Err(Error::Locked { .. }) => {}
        other => panic!("expected a lock error, got {other:?}"),
    }

    writer.execute_batch("ROLLBACK;")?;
    assert_eq!(explorer.tables()?.len(), 3);
    Ok(())
}
