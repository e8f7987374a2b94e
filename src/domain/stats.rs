//! Per-column statistics.

use serde::Serialize;

use super::value::Value;

/// Statistics for one column of a table.
///
/// `min`, `max`, `avg` and `sum` are only populated for columns whose
/// declared type is numeric; `None` means "not applicable", not zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    pub total_rows: i64,
    pub non_null: i64,
    pub null_count: i64,
    pub null_pct: f64,
    pub distinct: i64,
    pub min: Option<Value>,
    pub max: Option<Value>,
    pub avg: Option<f64>,
    pub sum: Option<Value>,
}

/// Null share as a percentage rounded to one decimal; 0.0 for empty tables.
#[must_use]
pub fn null_percentage(null_count: i64, total_rows: i64) -> f64 {
    if total_rows <= 0 {
        return 0.0;
    }
    let pct = null_count as f64 / total_rows as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

impl ColumnStats {
    /// Average rounded to two decimals for display.
    #[must_use]
    pub fn avg_display(&self) -> Option<String> {
        self.avg.map(|avg| format!("{avg:.2}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_percentage_rounds_to_one_decimal() {
        assert_eq!(null_percentage(1, 5), 20.0);
        assert_eq!(null_percentage(1, 3), 33.3);
        assert_eq!(null_percentage(2, 3), 66.7);
        assert_eq!(null_percentage(0, 10), 0.0);
    }

    #[test]
    fn null_percentage_of_empty_table_is_zero() {
        assert_eq!(null_percentage(0, 0), 0.0);
    }
}
