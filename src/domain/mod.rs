//! Engine-agnostic snapshot types shared by the reader, analytics, and formatter.

pub mod diff;
pub mod rows;
pub mod schema;
pub mod search;
pub mod size;
pub mod stats;
pub mod value;

pub use diff::{DiffResult, TableDiff, TypeChange};
pub use rows::{BrowseOptions, Page, Record, RowSet};
pub use schema::{
    total_rows, ColumnKind, ColumnMeta, DatabaseInfo, ForeignKeyMeta, IndexMeta, TableMeta,
    TableSummary,
};
pub use search::SearchMatch;
pub use size::{SizeReport, TableSize, VacuumOutcome, VacuumPreview, VacuumReport};
pub use stats::ColumnStats;
pub use value::Value;
