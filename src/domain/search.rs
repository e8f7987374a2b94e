//! Cross-table search results.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::value::Value;

/// One row that matched a search term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    pub table: String,
    pub matched_columns: Vec<String>,
    /// Full row in column order, including non-textual columns for context.
    #[serde(rename = "data", serialize_with = "serialize_row")]
    pub row: Vec<(String, Value)>,
}

impl SearchMatch {
    /// Value of the named column in the matched row.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.row
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn is_match(&self, column: &str) -> bool {
        self.matched_columns.iter().any(|name| name == column)
    }
}

fn serialize_row<S: Serializer>(row: &[(String, Value)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(row.len()))?;
    for (column, value) in row {
        map.serialize_entry(column, value)?;
    }
    map.end()
}
