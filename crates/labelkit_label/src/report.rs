//! Label run report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::EnumRejectReason;

/// One per-file failure collected during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFileError {
    /// File that failed to load or process.
    pub path: PathBuf,
    /// Rendered error message.
    pub exception: String,
}

/// Counters and diagnostics of one label pipeline run.
#[derive(Debug, Default, Clone)]
pub struct ReportLabel {
    /// Files selected by the directory scan.
    pub cnt_files_scanned: u64,
    /// Files loaded and normalized successfully.
    pub cnt_files_loaded: u64,
    /// Scanned files with an unsupported extension.
    pub cnt_files_skipped: u64,
    /// Rows read across loaded files.
    pub cnt_rows_total: u64,
    /// Rows kept by the filter.
    pub cnt_rows_matched: u64,
    /// Rows accepted by normalization.
    pub cnt_records_accepted: u64,
    pub cnt_rejected_hostname: u64,
    pub cnt_rejected_address_block: u64,
    pub cnt_rejected_zone: u64,
    /// Front labels laid out (placeholders excluded).
    pub cnt_labels_front: u64,
    /// Side labels laid out (placeholders excluded).
    pub cnt_labels_side: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
    /// Per-file failures.
    pub errors: Vec<SpecFileError>,
}

impl ReportLabel {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Rows rejected by normalization, all reasons.
    pub fn cnt_rejected(&self) -> u64 {
        self.cnt_rejected_hostname + self.cnt_rejected_address_block + self.cnt_rejected_zone
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        for (c_key, n_value) in [
            ("cnt_files_scanned", self.cnt_files_scanned),
            ("cnt_files_loaded", self.cnt_files_loaded),
            ("cnt_files_skipped", self.cnt_files_skipped),
            ("cnt_rows_total", self.cnt_rows_total),
            ("cnt_rows_matched", self.cnt_rows_matched),
            ("cnt_records_accepted", self.cnt_records_accepted),
            ("cnt_rejected_hostname", self.cnt_rejected_hostname),
            ("cnt_rejected_address_block", self.cnt_rejected_address_block),
            ("cnt_rejected_zone", self.cnt_rejected_zone),
            ("cnt_labels_front", self.cnt_labels_front),
            ("cnt_labels_side", self.cnt_labels_side),
            ("cnt_warnings", self.warning_count() as u64),
            ("cnt_errors", self.error_count() as u64),
        ] {
            dict_counts.insert(c_key.to_string(), n_value);
        }
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} files={}/{} rows={} matched={} accepted={} rejected={} labels_front={} labels_side={} warnings={} errors={}",
            self.cnt_files_loaded,
            self.cnt_files_scanned,
            self.cnt_rows_total,
            self.cnt_rows_matched,
            self.cnt_records_accepted,
            self.cnt_rejected(),
            self.cnt_labels_front,
            self.cnt_labels_side,
            self.warning_count(),
            self.error_count()
        )
    }
}

impl fmt::Display for ReportLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[LABEL]"))
    }
}

/// Mutable accumulator for run results.
#[derive(Debug, Default, Clone)]
pub struct ReportLabelBuilder {
    report: ReportLabel,
}

impl ReportLabelBuilder {
    pub fn set_files_scanned(&mut self, n_files: u64) {
        self.report.cnt_files_scanned = n_files;
    }

    pub fn add_skipped(&mut self) {
        self.report.cnt_files_skipped += 1;
    }

    /// Account one successfully processed file.
    pub fn add_file_loaded(&mut self, cnt_rows_total: u64, cnt_rows_matched: u64) {
        self.report.cnt_files_loaded += 1;
        self.report.cnt_rows_total += cnt_rows_total;
        self.report.cnt_rows_matched += cnt_rows_matched;
    }

    pub fn add_accepted(&mut self, n_records: u64) {
        self.report.cnt_records_accepted += n_records;
    }

    pub fn add_rejected(&mut self, reason: EnumRejectReason, n_rows: u64) {
        match reason {
            EnumRejectReason::Hostname => self.report.cnt_rejected_hostname += n_rows,
            EnumRejectReason::AddressBlock => self.report.cnt_rejected_address_block += n_rows,
            EnumRejectReason::Zone => self.report.cnt_rejected_zone += n_rows,
        }
    }

    pub fn set_labels(&mut self, cnt_labels_front: u64, cnt_labels_side: u64) {
        self.report.cnt_labels_front = cnt_labels_front;
        self.report.cnt_labels_side = cnt_labels_side;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        tracing::warn!("{warning}");
        self.report.warnings.push(warning);
    }

    /// Adopt warnings already logged by a lower layer.
    pub fn extend_warnings<I>(&mut self, warnings: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.report.warnings.extend(warnings);
    }

    /// Record one per-file failure.
    pub fn add_error(&mut self, path: PathBuf, exception: String) {
        tracing::error!("{}: {exception}", path.display());
        self.report.errors.push(SpecFileError { path, exception });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportLabel {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReportLabel, ReportLabelBuilder};
    use crate::spec::EnumRejectReason;

    #[test]
    fn builder_accumulates_counters() {
        let mut builder = ReportLabelBuilder::default();
        builder.set_files_scanned(3);
        builder.add_skipped();
        builder.add_file_loaded(10, 6);
        builder.add_file_loaded(4, 4);
        builder.add_accepted(7);
        builder.add_rejected(EnumRejectReason::Hostname, 2);
        builder.add_rejected(EnumRejectReason::AddressBlock, 1);
        builder.set_labels(14, 14);
        builder.add_error(PathBuf::from("bad.xlsx"), "broken".to_string());

        let report = builder.build();
        assert_eq!(report.cnt_files_loaded, 2);
        assert_eq!(report.cnt_rows_total, 14);
        assert_eq!(report.cnt_rows_matched, 10);
        assert_eq!(report.cnt_rejected(), 3);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors[0].exception, "broken");
    }

    #[test]
    fn extend_warnings_keeps_order() {
        let mut builder = ReportLabelBuilder::default();
        builder.extend_warnings(vec!["a".to_string(), "b".to_string()]);
        builder.add_warning("c".to_string());
        assert_eq!(builder.build().warnings, vec!["a", "b", "c"]);
    }

    #[test]
    fn report_to_dict_and_format() {
        let report = ReportLabel {
            cnt_files_scanned: 2,
            cnt_files_loaded: 1,
            cnt_rows_total: 5,
            cnt_rows_matched: 3,
            cnt_records_accepted: 2,
            cnt_rejected_zone: 1,
            cnt_labels_front: 2,
            cnt_labels_side: 2,
            ..ReportLabel::default()
        };
        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_rejected_zone"], 1);
        assert_eq!(dict_counts["cnt_errors"], 0);
        assert_eq!(
            report.to_string(),
            "[LABEL] files=1/2 rows=5 matched=3 accepted=2 rejected=1 labels_front=2 labels_side=2 warnings=0 errors=0"
        );
    }
}
