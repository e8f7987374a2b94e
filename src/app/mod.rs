//! Application layer - the `Explorer` façade and cross-database operations.

mod explorer;

pub use explorer::{diff, ExportOutcome, ExportSource, Explorer};
