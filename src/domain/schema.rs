//! Catalog snapshots: tables, columns, indexes, and database-level counters.
//!
//! Every value here is read fresh from the engine on each request and never
//! cached across calls.

use serde::Serialize;

/// Declared type shown for columns created without one.
pub const UNTYPED: &str = "ANY";

/// Coarse classification of a declared column type.
///
/// Follows SQLite's affinity rules, with one refinement: declared types that
/// name no numeric or binary keyword (`DATETIME`, `JSON`, `UUID`, ...) are
/// treated as text, since that is what such columns hold in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Blob,
}

impl ColumnKind {
    /// Classify a declared type such as `VARCHAR(20)` or `unsigned big int`.
    #[must_use]
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.trim().to_ascii_uppercase();
        if upper.is_empty() || upper == UNTYPED {
            return ColumnKind::Text;
        }
        if upper.contains("INT") {
            return ColumnKind::Numeric;
        }
        if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            return ColumnKind::Text;
        }
        if upper.contains("BLOB") {
            return ColumnKind::Blob;
        }
        const NUMERIC_KEYWORDS: [&str; 6] = ["REAL", "FLOA", "DOUB", "NUM", "DEC", "BOOL"];
        if NUMERIC_KEYWORDS.iter().any(|keyword| upper.contains(keyword)) {
            return ColumnKind::Numeric;
        }
        ColumnKind::Text
    }
}

/// Column definition from `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMeta {
    pub cid: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub primary_key: bool,
}

impl ColumnMeta {
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        ColumnKind::from_declared(&self.declared_type)
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    #[must_use]
    pub fn is_textual(&self) -> bool {
        self.kind() == ColumnKind::Text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexMeta {
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyMeta {
    pub id: i64,
    pub from: String,
    pub table: String,
    /// Referenced column; `None` when the key targets the parent's primary key implicitly.
    pub to: Option<String>,
}

/// Full definition of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMeta {
    pub name: String,
    pub columns: Vec<ColumnMeta>,
    pub row_count: i64,
    pub indexes: Vec<IndexMeta>,
    pub foreign_keys: Vec<ForeignKeyMeta>,
    pub create_sql: Option<String>,
}

impl TableMeta {
    /// Column lookup by exact name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// One entry of the table listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub row_count: i64,
    pub column_count: usize,
}

/// Sum of row counts across a table listing.
#[must_use]
pub fn total_rows(tables: &[TableSummary]) -> i64 {
    tables.iter().map(|table| table.row_count).sum()
}

/// Database-wide metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub path: String,
    pub file_size: u64,
    pub modified: String,
    pub sqlite_version: String,
    pub encoding: String,
    pub journal_mode: String,
    pub page_size: i64,
    pub page_count: i64,
    pub freelist_count: i64,
    pub table_count: i64,
    pub index_count: i64,
    pub view_count: i64,
    pub trigger_count: i64,
}
