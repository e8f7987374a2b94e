//! Schema and row-count comparison between two databases.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeChange {
    pub column: String,
    pub type_a: String,
    pub type_b: String,
}

/// Differences for a table present in both databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDiff {
    pub table: String,
    pub columns_only_in_a: Vec<String>,
    pub columns_only_in_b: Vec<String>,
    pub type_changes: Vec<TypeChange>,
    pub row_count_a: i64,
    pub row_count_b: i64,
    /// Signed difference `A - B`.
    pub row_diff: i64,
}

impl TableDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns_only_in_a.is_empty()
            && self.columns_only_in_b.is_empty()
            && self.type_changes.is_empty()
            && self.row_diff == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub database_a: String,
    pub database_b: String,
    pub tables_only_in_a: Vec<String>,
    pub tables_only_in_b: Vec<String>,
    pub common_tables: usize,
    pub table_differences: Vec<TableDiff>,
    /// No tables on one side only and no per-table differences.
    pub identical_schema: bool,
}

impl DiffResult {
    /// Assemble a result, deriving `identical_schema` from the categories.
    #[must_use]
    pub fn new(
        database_a: String,
        database_b: String,
        tables_only_in_a: Vec<String>,
        tables_only_in_b: Vec<String>,
        common_tables: usize,
        table_differences: Vec<TableDiff>,
    ) -> Self {
        let identical_schema = tables_only_in_a.is_empty()
            && tables_only_in_b.is_empty()
            && table_differences.is_empty();
        Self {
            database_a,
            database_b,
            tables_only_in_a,
            tables_only_in_b,
            common_tables,
            table_differences,
            identical_schema,
        }
    }

    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.identical_schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_flag_is_serialized() {
        let same = DiffResult::new("a".into(), "b".into(), vec![], vec![], 2, vec![]);
        let json = serde_json::to_value(&same).unwrap();
        assert_eq!(json["identical_schema"], true);

        let drift = DiffResult::new("a".into(), "b".into(), vec!["t".into()], vec![], 2, vec![]);
        assert!(!drift.is_identical());
        assert_eq!(serde_json::to_value(&drift).unwrap()["identical_schema"], false);
    }
}
