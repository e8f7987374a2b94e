//! Result sets returned by queries and browsing.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::value::Value;

/// Ordered rows with their column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows viewed as column-name → value mappings, in column order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |row| Record {
            columns: &self.columns,
            values: row,
        })
    }
}

/// One row of a [`RowSet`] serialized as an object.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    /// Value of the named column, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (index, column) in self.columns.iter().enumerate() {
            map.serialize_entry(column, self.values.get(index).unwrap_or(&Value::Null))?;
        }
        map.end()
    }
}

/// Paging and filtering for `browse`.
///
/// `where_clause` and `order_by` are raw SQL fragments inserted verbatim
/// after `WHERE` / `ORDER BY`. They are a trust boundary: the operator is
/// assumed trusted and no sanitizing is attempted. `limit` and `offset` are
/// always bound as parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseOptions {
    pub limit: usize,
    pub offset: usize,
    pub where_clause: Option<String>,
    pub order_by: Option<String>,
}

impl BrowseOptions {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }
}

/// A window of table rows produced by `browse`.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub table: String,
    #[serde(flatten)]
    pub data: RowSet,
    pub total_rows: i64,
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Human-readable position, e.g. `2-3 of 5`; `0-0 of 5` for an empty page.
    #[must_use]
    pub fn showing(&self) -> String {
        if self.data.is_empty() {
            return format!("0-0 of {}", self.total_rows);
        }
        format!(
            "{}-{} of {}",
            self.offset + 1,
            self.offset + self.data.len(),
            self.total_rows
        )
    }
}
