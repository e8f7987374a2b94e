//! Storage accounting and compaction reports.

use serde::Serialize;

/// Estimated footprint of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSize {
    pub table: String,
    pub rows: i64,
    pub columns: usize,
    /// Sampled average row width times row count. Not exact page accounting.
    pub estimated_bytes: u64,
    pub estimated: bool,
}

/// Page-level space usage for a database file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeReport {
    pub file_size: u64,
    pub page_size: i64,
    pub page_count: i64,
    pub used_pages: i64,
    pub free_pages: i64,
    pub used_bytes: i64,
    pub free_bytes: i64,
    pub free_pct: f64,
    pub tables: Vec<TableSize>,
}

impl SizeReport {
    /// Derive the page accounting fields from raw engine counters.
    #[must_use]
    pub fn from_pages(file_size: u64, page_size: i64, page_count: i64, free_pages: i64) -> Self {
        let used_pages = page_count - free_pages;
        Self {
            file_size,
            page_size,
            page_count,
            used_pages,
            free_pages,
            used_bytes: used_pages * page_size,
            free_bytes: free_pages * page_size,
            free_pct: percentage(free_pages as f64, page_count as f64),
            tables: Vec::new(),
        }
    }
}

/// What a compaction would reclaim, computed without touching the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacuumPreview {
    pub current_size: u64,
    pub page_size: i64,
    pub free_pages: i64,
    pub reclaimable_bytes: u64,
    pub estimated_size: u64,
}

/// Sizes observed around a completed compaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacuumReport {
    pub before_size: u64,
    pub after_size: u64,
    pub saved_bytes: i64,
    pub saved_pct: f64,
}

impl VacuumReport {
    #[must_use]
    pub fn new(before_size: u64, after_size: u64) -> Self {
        let saved_bytes = before_size as i64 - after_size as i64;
        Self {
            before_size,
            after_size,
            saved_bytes,
            saved_pct: percentage(saved_bytes as f64, before_size as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VacuumOutcome {
    Preview(VacuumPreview),
    Completed(VacuumReport),
}

/// `part / whole` as a percentage rounded to one decimal; 0.0 when `whole` is zero.
#[must_use]
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    (part / whole * 1000.0).round() / 10.0
}

/// Human-readable byte count, e.g. `1.5 MB`.
#[must_use]
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 0 {
        return "N/A".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_scales_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(-1), "N/A");
    }

    #[test]
    fn page_accounting() {
        let report = SizeReport::from_pages(40_960, 4096, 10, 2);
        assert_eq!(report.used_pages, 8);
        assert_eq!(report.used_bytes, 8 * 4096);
        assert_eq!(report.free_bytes, 2 * 4096);
        assert_eq!(report.free_pct, 20.0);
    }

    #[test]
    fn empty_database_has_zero_free_pct() {
        let report = SizeReport::from_pages(0, 4096, 0, 0);
        assert_eq!(report.free_pct, 0.0);
    }

    #[test]
    fn vacuum_report_savings() {
        let report = VacuumReport::new(8192, 4096);
        assert_eq!(report.saved_bytes, 4096);
        assert_eq!(report.saved_pct, 50.0);

        let unchanged = VacuumReport::new(0, 0);
        assert_eq!(unchanged.saved_pct, 0.0);
    }
}
