//! Column statistics, text search, storage estimates, and schema diffs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::domain::stats::null_percentage;
use crate::domain::{
    ColumnMeta, ColumnStats, DiffResult, SearchMatch, SizeReport, TableDiff, TableSize,
    TypeChange, Value, VacuumPreview,
};
use crate::error::{Error, Result};

use super::connection::file_size;
use super::metadata::{columns, list_tables, pragma_i64, quote_ident, require_table, row_count, table_names};
use super::sql_err;

/// Statistics for each column of `table`, or only for `only` when given.
///
/// Requested columns keep the caller's order; unknown names fail with
/// [`Error::ColumnNotFound`].
pub fn column_stats(
    conn: &Connection,
    table: &str,
    only: Option<&[String]>,
) -> Result<Vec<ColumnStats>> {
    require_table(conn, table)?;
    let all = columns(conn, table)?;

    let selected: Vec<&ColumnMeta> = match only {
        Some(names) if !names.is_empty() => names
            .iter()
            .map(|name| {
                all.iter().find(|column| &column.name == name).ok_or_else(|| {
                    let available: Vec<String> = all.iter().map(|c| c.name.clone()).collect();
                    Error::column_not_found(table, name, &available)
                })
            })
            .collect::<Result<_>>()?,
        _ => all.iter().collect(),
    };

    let total_rows = row_count(conn, table)?;
    selected
        .into_iter()
        .map(|column| stats_for(conn, table, column, total_rows))
        .collect()
}

fn stats_for(
    conn: &Connection,
    table: &str,
    column: &ColumnMeta,
    total_rows: i64,
) -> Result<ColumnStats> {
    let ident = quote_ident(&column.name);
    let from = quote_ident(table);

    let counts_sql = format!("SELECT COUNT({ident}), COUNT(DISTINCT {ident}) FROM {from}");
    let (non_null, distinct): (i64, i64) = conn
        .query_row(&counts_sql, [], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(sql_err(&counts_sql))?;

    let mut stats = ColumnStats {
        column: column.name.clone(),
        declared_type: column.declared_type.clone(),
        total_rows,
        non_null,
        null_count: total_rows - non_null,
        null_pct: null_percentage(total_rows - non_null, total_rows),
        distinct,
        min: None,
        max: None,
        avg: None,
        sum: None,
    };

    if column.is_numeric() {
        let numeric_sql = format!("SELECT MIN({ident}), MAX({ident}), AVG({ident}) FROM {from}");
        let (min, max, avg) = conn
            .query_row(&numeric_sql, [], |row| {
                Ok((
                    non_null_value(Value::from(row.get_ref(0)?)),
                    non_null_value(Value::from(row.get_ref(1)?)),
                    row.get::<_, Option<f64>>(2)?,
                ))
            })
            .map_err(sql_err(&numeric_sql))?;
        stats.min = min;
        stats.max = max;
        stats.avg = avg;
        stats.sum = column_sum(conn, &ident, &from)?;
    }

    Ok(stats)
}

/// `SUM` of the column, falling back to the real-valued `TOTAL` when the
/// integer sum does not fit in an i64.
fn column_sum(conn: &Connection, ident: &str, from: &str) -> Result<Option<Value>> {
    let sum_sql = format!("SELECT SUM({ident}) FROM {from}");
    match conn.query_row(&sum_sql, [], |row| Ok(Value::from(row.get_ref(0)?))) {
        Ok(sum) => Ok(non_null_value(sum)),
        Err(err) if is_integer_overflow(&err) => {
            debug!(column = ident, "Integer sum overflowed, using TOTAL");
            let total_sql = format!("SELECT TOTAL({ident}) FROM {from}");
            let total: f64 = conn
                .query_row(&total_sql, [], |row| row.get(0))
                .map_err(sql_err(&total_sql))?;
            Ok(Some(Value::Real(total)))
        }
        Err(err) => Err(Error::sql(err, sum_sql)),
    }
}

fn is_integer_overflow(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(message)) if message.contains("integer overflow")
    )
}

fn non_null_value(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

/// Rows whose textual columns contain `term`, case-insensitively.
///
/// The term is matched literally; `%` and `_` have no special meaning.
/// Stops after `limit` matches. An empty term matches nothing.
pub fn search(
    conn: &Connection,
    term: &str,
    tables: Option<&[String]>,
    limit: usize,
) -> Result<Vec<SearchMatch>> {
    if term.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }
    let needle = term.to_lowercase();

    let targets = match tables {
        Some(names) if !names.is_empty() => {
            for name in names {
                require_table(conn, name)?;
            }
            names.to_vec()
        }
        _ => table_names(conn)?,
    };

    let mut matches = Vec::new();
    for table in &targets {
        let textual: BTreeSet<String> = columns(conn, table)?
            .into_iter()
            .filter(ColumnMeta::is_textual)
            .map(|column| column.name)
            .collect();
        if textual.is_empty() {
            continue;
        }

        let sql = format!("SELECT * FROM {}", quote_ident(table));
        let mut stmt = conn.prepare(&sql).map_err(sql_err(&sql))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query([]).map_err(sql_err(&sql))?;

        while let Some(row) = rows.next().map_err(sql_err(&sql))? {
            let mut values = Vec::with_capacity(names.len());
            let mut matched_columns = Vec::new();
            for (index, name) in names.iter().enumerate() {
                let value = Value::from(row.get_ref(index).map_err(sql_err(&sql))?);
                if textual.contains(name)
                    && value
                        .searchable_text()
                        .is_some_and(|text| text.contains(&needle))
                {
                    matched_columns.push(name.clone());
                }
                values.push((name.clone(), value));
            }

            if !matched_columns.is_empty() {
                matches.push(SearchMatch {
                    table: table.clone(),
                    matched_columns,
                    row: values,
                });
                if matches.len() >= limit {
                    debug!(term, limit, "Search limit reached");
                    return Ok(matches);
                }
            }
        }
    }

    debug!(term, found = matches.len(), "Search complete");
    Ok(matches)
}

/// Page accounting for the file plus a per-table size estimate.
pub fn size_report(conn: &Connection, path: &Path, sample_rows: usize) -> Result<SizeReport> {
    let mut report = SizeReport::from_pages(
        file_size(path)?,
        pragma_i64(conn, "page_size")?,
        pragma_i64(conn, "page_count")?,
        pragma_i64(conn, "freelist_count")?,
    );

    for summary in list_tables(conn)? {
        let estimated_bytes = if summary.row_count == 0 {
            0
        } else {
            let width = average_row_width(conn, &summary.name, sample_rows)?;
            (width * summary.row_count as f64).round() as u64
        };
        report.tables.push(TableSize {
            table: summary.name,
            rows: summary.row_count,
            columns: summary.column_count,
            estimated_bytes,
            estimated: true,
        });
    }
    Ok(report)
}

/// Mean stored width of up to `sample_rows` rows: 8 bytes per number, byte
/// length for text and blobs, nothing for NULL.
fn average_row_width(conn: &Connection, table: &str, sample_rows: usize) -> Result<f64> {
    let widths: Vec<String> = columns(conn, table)?
        .iter()
        .map(|column| {
            let ident = quote_ident(&column.name);
            format!(
                "CASE typeof({ident}) WHEN 'integer' THEN 8 WHEN 'real' THEN 8 \
                 WHEN 'null' THEN 0 ELSE length(CAST({ident} AS BLOB)) END"
            )
        })
        .collect();
    if widths.is_empty() {
        return Ok(0.0);
    }

    let sql = format!(
        "SELECT AVG(w) FROM (SELECT {} AS w FROM {} LIMIT ?1)",
        widths.join(" + "),
        quote_ident(table)
    );
    let limit = i64::try_from(sample_rows.max(1)).unwrap_or(i64::MAX);
    let average: Option<f64> = conn
        .query_row(&sql, [limit], |row| row.get(0))
        .map_err(sql_err(&sql))?;
    Ok(average.unwrap_or(0.0))
}

/// What compaction would reclaim. Reads counters only; the file is untouched.
pub fn vacuum_preview(conn: &Connection, path: &Path) -> Result<VacuumPreview> {
    let current_size = file_size(path)?;
    let page_size = pragma_i64(conn, "page_size")?;
    let free_pages = pragma_i64(conn, "freelist_count")?;
    let reclaimable_bytes = u64::try_from(free_pages * page_size).unwrap_or(0);

    Ok(VacuumPreview {
        current_size,
        page_size,
        free_pages,
        reclaimable_bytes,
        estimated_size: current_size.saturating_sub(reclaimable_bytes),
    })
}

/// Compare table sets, column sets, declared types, and row counts.
///
/// Row contents are never compared.
pub fn diff(
    a: &Connection,
    database_a: &str,
    b: &Connection,
    database_b: &str,
) -> Result<DiffResult> {
    let tables_a: BTreeMap<String, i64> = list_tables(a)?
        .into_iter()
        .map(|t| (t.name, t.row_count))
        .collect();
    let tables_b: BTreeMap<String, i64> = list_tables(b)?
        .into_iter()
        .map(|t| (t.name, t.row_count))
        .collect();

    let only_in = |left: &BTreeMap<String, i64>, right: &BTreeMap<String, i64>| -> Vec<String> {
        left.keys().filter(|name| !right.contains_key(*name)).cloned().collect()
    };
    let tables_only_in_a = only_in(&tables_a, &tables_b);
    let tables_only_in_b = only_in(&tables_b, &tables_a);

    let mut common_tables = 0;
    let mut table_differences = Vec::new();
    for (table, &row_count_a) in &tables_a {
        let Some(&row_count_b) = tables_b.get(table) else {
            continue;
        };
        common_tables += 1;

        let table_diff = compare_table(
            table,
            &columns(a, table)?,
            &columns(b, table)?,
            row_count_a,
            row_count_b,
        );
        if !table_diff.is_empty() {
            table_differences.push(table_diff);
        }
    }

    Ok(DiffResult::new(
        database_a.to_string(),
        database_b.to_string(),
        tables_only_in_a,
        tables_only_in_b,
        common_tables,
        table_differences,
    ))
}

fn compare_table(
    table: &str,
    columns_a: &[ColumnMeta],
    columns_b: &[ColumnMeta],
    row_count_a: i64,
    row_count_b: i64,
) -> TableDiff {
    let types_a: BTreeMap<&str, &str> = columns_a
        .iter()
        .map(|c| (c.name.as_str(), c.declared_type.as_str()))
        .collect();
    let types_b: BTreeMap<&str, &str> = columns_b
        .iter()
        .map(|c| (c.name.as_str(), c.declared_type.as_str()))
        .collect();

    let columns_only_in_a = types_a
        .keys()
        .filter(|name| !types_b.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    let columns_only_in_b = types_b
        .keys()
        .filter(|name| !types_a.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    let type_changes = types_a
        .iter()
        .filter_map(|(name, type_a)| {
            let type_b = types_b.get(name)?;
            (type_a != type_b).then(|| TypeChange {
                column: name.to_string(),
                type_a: type_a.to_string(),
                type_b: type_b.to_string(),
            })
        })
        .collect();

    TableDiff {
        table: table.to_string(),
        columns_only_in_a,
        columns_only_in_b,
        type_changes,
        row_count_a,
        row_count_b,
        row_diff: row_count_a - row_count_b,
    }
}
