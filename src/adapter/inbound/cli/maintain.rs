//! Handlers for `diff` and `vacuum`.

use super::command::{DiffArgs, VacuumArgs};
use super::output;
use crate::app::{self, Explorer};
use crate::config::ExplorerConfig;
use crate::domain::size::format_size;
use crate::domain::{DiffResult, TableDiff, VacuumOutcome};
use crate::error::Result;
use crate::format::{json, OutputFormat};

/// Execute the `diff` command.
pub fn diff(args: &DiffArgs, config: &ExplorerConfig) -> Result<()> {
    let format = args
        .format
        .ensure_one_of("diff", &[OutputFormat::Text, OutputFormat::Json])?;
    let result = app::diff(&args.db_a, &args.db_b, config)?;

    if format == OutputFormat::Json {
        return output::data(&json::render_value(&result)?);
    }
    print_diff(&result);
    Ok(())
}

fn print_diff(result: &DiffResult) {
    output::section("SCHEMA DIFF");
    output::field("A", &result.database_a);
    output::field("B", &result.database_b);
    output::field("Common tables", result.common_tables);

    if result.is_identical() {
        println!();
        output::success("Schemas and row counts are identical");
        return;
    }

    for (label, tables) in [
        ("Tables only in A:", &result.tables_only_in_a),
        ("Tables only in B:", &result.tables_only_in_b),
    ] {
        if tables.is_empty() {
            continue;
        }
        println!();
        output::lines(label);
        for table in tables {
            output::lines(&format!("  + {table}"));
        }
    }

    if !result.table_differences.is_empty() {
        println!();
        output::lines("Table differences:");
        for table in &result.table_differences {
            output::lines(&describe_table(table).join("\n"));
        }
    }
}

fn describe_table(diff: &TableDiff) -> Vec<String> {
    let mut lines = vec![format!("  Table: {}", diff.table)];
    if !diff.columns_only_in_a.is_empty() {
        lines.push(format!(
            "    Columns only in A: {}",
            diff.columns_only_in_a.join(", ")
        ));
    }
    if !diff.columns_only_in_b.is_empty() {
        lines.push(format!(
            "    Columns only in B: {}",
            diff.columns_only_in_b.join(", ")
        ));
    }
    for change in &diff.type_changes {
        lines.push(format!(
            "    Column '{}': {} (A) vs {} (B)",
            change.column, change.type_a, change.type_b
        ));
    }
    if diff.row_diff != 0 {
        let delta = if diff.row_diff > 0 {
            output::positive(format!("{:+}", diff.row_diff))
        } else {
            output::negative(diff.row_diff)
        };
        lines.push(format!(
            "    Row count: {} (A) vs {} (B) [diff: {delta}]",
            diff.row_count_a, diff.row_count_b
        ));
    }
    lines
}

/// Execute the `vacuum` command.
pub fn vacuum(args: &VacuumArgs, config: &ExplorerConfig) -> Result<()> {
    let format = args
        .format
        .ensure_one_of("vacuum", &[OutputFormat::Text, OutputFormat::Json])?;
    let mut explorer = Explorer::with_config(&args.db, config.clone())?;

    let outcome = if args.confirm && format == OutputFormat::Text {
        let pb = output::spinner("Vacuuming database...");
        match explorer.vacuum(true) {
            Ok(outcome) => {
                output::spinner_success(&pb, "Vacuum finished");
                outcome
            }
            Err(err) => {
                output::spinner_fail(&pb, "Vacuum failed");
                return Err(err);
            }
        }
    } else {
        explorer.vacuum(args.confirm)?
    };
    explorer.close()?;

    if format == OutputFormat::Json {
        return output::data(&json::render_value(&outcome)?);
    }

    match outcome {
        VacuumOutcome::Preview(preview) => {
            output::section("VACUUM PREVIEW");
            output::field("Current size", format_size(preview.current_size as i64));
            output::field("Free pages", preview.free_pages);
            output::field("Reclaimable", format_size(preview.reclaimable_bytes as i64));
            output::field("Estimated size", format_size(preview.estimated_size as i64));
            println!();
            output::warning("Vacuum rewrites the database file; nothing was changed");
            output::hint(&format!(
                "back up the file, then add {} to proceed",
                output::highlight("--confirm")
            ));
        }
        VacuumOutcome::Completed(report) => {
            output::section("VACUUM COMPLETE");
            output::field("Before", format_size(report.before_size as i64));
            output::field("After", format_size(report.after_size as i64));
            output::field(
                "Saved",
                format!("{} ({:.1}%)", format_size(report.saved_bytes.max(0)), report.saved_pct),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TypeChange;

    #[test]
    fn describes_every_kind_of_table_difference() {
        owo_colors::set_override(false);
        let diff = TableDiff {
            table: "users".into(),
            columns_only_in_a: vec!["email".into()],
            columns_only_in_b: vec![],
            type_changes: vec![TypeChange {
                column: "name".into(),
                type_a: "TEXT".into(),
                type_b: "VARCHAR(20)".into(),
            }],
            row_count_a: 5,
            row_count_b: 2,
            row_diff: 3,
        };
        assert_eq!(
            describe_table(&diff),
            vec![
                "  Table: users",
                "    Columns only in A: email",
                "    Column 'name': TEXT (A) vs VARCHAR(20) (B)",
                "    Row count: 5 (A) vs 2 (B) [diff: +3]",
            ]
        );
    }
}
