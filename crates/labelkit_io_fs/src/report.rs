//! Scan report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Result of one `scan_dir` run.
#[derive(Debug, Default, Clone)]
pub struct ReportScan {
    /// Selected files, in deterministic (name-sorted, depth-first) order.
    pub files: Vec<PathBuf>,
    /// Total inspected directory/file entries.
    pub cnt_scanned: u64,
    /// Number of files that passed the filters.
    pub cnt_matched: u64,
    /// Number of entries skipped (hidden, excluded, special).
    pub cnt_skipped: u64,
    /// Non-fatal warnings collected during traversal.
    pub warnings: Vec<String>,
}

impl ReportScan {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_matched".to_string(), self.cnt_matched);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} matched={} skipped={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_matched"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SCAN]"))
    }
}

/// Mutable accumulator for scan results.
#[derive(Debug, Default, Clone)]
pub struct ReportScanBuilder {
    /// See [`ReportScan::files`].
    pub files: Vec<PathBuf>,
    /// See [`ReportScan::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportScan::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportScan::warnings`].
    pub warnings: Vec<String>,
}

impl ReportScanBuilder {
    /// Increment scanned count by one.
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Increment skipped count by one.
    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Record one selected file.
    pub fn add_file(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportScan {
        ReportScan {
            cnt_matched: self.files.len() as u64,
            files: self.files,
            cnt_scanned: self.cnt_scanned,
            cnt_skipped: self.cnt_skipped,
            warnings: self.warnings,
        }
    }
}
