//! Scan -> load -> filter -> normalize -> merge -> paginate orchestration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use labelkit_io_fs::{ScanDirError, scan_dir};
use labelkit_io_xlsx::{is_supported_spreadsheet, read_sheet_dataframe};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::filter::SpecRowFilter;
use crate::merge::merge_tables;
use crate::normalize::normalize_frame;
use crate::paginate::{SpecLabelLayout, paginate, validate_repeat_count};
use crate::record::{NormalizedRecord, NormalizedTable};
use crate::render::render_document;
use crate::report::{ReportLabel, ReportLabelBuilder};
use crate::spec::{EnumRejectReason, LabelError, SpecLabelOptions};

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct ResultLabelRun {
    /// Merged accepted records, in file then row order.
    pub records: Vec<NormalizedRecord>,
    /// Padded front and side grids.
    pub layout: SpecLabelLayout,
    pub report: ReportLabel,
    /// `true` when the scan directory was missing; nothing was processed.
    pub if_scan_failed: bool,
    /// Written document, set by [`LabelPipeline::run_and_render`].
    pub path_file_out: Option<PathBuf>,
}

#[derive(Debug)]
struct SpecFileOutcome {
    table: NormalizedTable,
    cnt_rows_total: u64,
    cnt_rows_matched: u64,
    cnt_rejected_by_reason: BTreeMap<EnumRejectReason, u64>,
}

type TypeFileResult = (PathBuf, Result<SpecFileOutcome, String>);

/// Label pipeline bound to one set of options.
#[derive(Debug, Clone)]
pub struct LabelPipeline {
    options: SpecLabelOptions,
    filter: SpecRowFilter,
}

impl LabelPipeline {
    /// Compile filters up front; invalid patterns and unprintable repeat
    /// counts fail here.
    pub fn new(options: SpecLabelOptions) -> Result<Self, LabelError> {
        validate_repeat_count(options.repeat_count)?;
        let filter = SpecRowFilter::from_options(&options)?;
        Ok(Self { options, filter })
    }

    pub fn options(&self) -> &SpecLabelOptions {
        &self.options
    }

    /// Run every stage except rendering.
    pub fn run(&self) -> Result<ResultLabelRun, LabelError> {
        let mut builder = ReportLabelBuilder::default();

        let scan_options = self.options.scan_options.clone();
        let report_scan = match scan_dir(&self.options.scan_path, scan_options) {
            Ok(report_scan) => report_scan,
            Err(ScanDirError::SourceNotDirectory(path)) => {
                builder.add_warning(format!(
                    "Scan path is not a directory: {}; nothing to do.",
                    path.display()
                ));
                return Ok(ResultLabelRun {
                    records: Vec::new(),
                    layout: paginate(&[], self.options.repeat_count, &self.options.label_values)?,
                    report: builder.build(),
                    if_scan_failed: true,
                    path_file_out: None,
                });
            }
            Err(e) => return Err(e.into()),
        };
        builder.extend_warnings(report_scan.warnings);
        builder.set_files_scanned(report_scan.cnt_matched);

        let mut l_files = Vec::with_capacity(report_scan.files.len());
        for path_file in report_scan.files {
            if is_supported_spreadsheet(&path_file) {
                l_files.push(path_file);
            } else {
                tracing::debug!("Skipping unsupported file {}", path_file.display());
                builder.add_skipped();
            }
        }

        let l_results = self.load_files(l_files, &mut builder);
        let mut l_tables = Vec::with_capacity(l_results.len());
        for (path_file, res_file) in l_results {
            match res_file {
                Ok(outcome) => {
                    builder.add_file_loaded(outcome.cnt_rows_total, outcome.cnt_rows_matched);
                    builder.add_accepted(outcome.table.records.len() as u64);
                    for (reason, n_rows) in outcome.cnt_rejected_by_reason {
                        builder.add_rejected(reason, n_rows);
                    }
                    l_tables.push(outcome.table);
                }
                Err(exception) => builder.add_error(path_file, exception),
            }
        }

        let records = merge_tables(l_tables);
        let layout = paginate(&records, self.options.repeat_count, &self.options.label_values)?;
        builder.set_labels(
            layout.front.n_labels() as u64,
            layout.side.n_labels() as u64,
        );

        let report = builder.build();
        tracing::info!("{report}");
        Ok(ResultLabelRun {
            records,
            layout,
            report,
            if_scan_failed: false,
            path_file_out: None,
        })
    }

    /// Run and write the label document unless the scan failed.
    pub fn run_and_render(&self) -> Result<ResultLabelRun, LabelError> {
        let mut result = self.run()?;
        if result.if_scan_failed {
            return Ok(result);
        }

        let path_file_out = self.options.path_file_out();
        let report_xlsx = render_document(
            &result.layout,
            &path_file_out,
            &self.options.label_values,
            self.options.if_render_placeholder_template,
        )?;
        result.report.warnings.extend(report_xlsx.warnings);
        result.path_file_out = Some(path_file_out);
        Ok(result)
    }

    fn load_files(
        &self,
        l_files: Vec<PathBuf>,
        builder: &mut ReportLabelBuilder,
    ) -> Vec<TypeFileResult> {
        let n_workers_max = calculate_worker_limit(self.options.num_workers_max);
        let load = |path_file: PathBuf| {
            let res_file = self.process_file(&path_file).map_err(|e| e.to_string());
            (path_file, res_file)
        };

        if n_workers_max <= 1 || l_files.len() <= 1 {
            return l_files.into_iter().map(load).collect();
        }

        let Ok(thread_pool) = ThreadPoolBuilder::new().num_threads(n_workers_max).build() else {
            builder.add_warning(format!(
                "Failed to initialize thread pool (workers={n_workers_max}); fallback to serial load."
            ));
            return l_files.into_iter().map(load).collect();
        };
        // `collect` on an indexed parallel iterator keeps input order.
        thread_pool.install(|| l_files.into_par_iter().map(load).collect())
    }

    fn process_file(&self, path_file: &Path) -> Result<SpecFileOutcome, LabelError> {
        let df = read_sheet_dataframe(path_file, self.options.sheet_name.as_deref())?;
        let df_matched = self.filter.apply(&df)?;
        let outcome = normalize_frame(&df_matched, &self.options.columns)?;

        tracing::debug!(
            "{}: rows={} matched={} accepted={}",
            path_file.display(),
            df.height(),
            df_matched.height(),
            outcome.records.len()
        );
        Ok(SpecFileOutcome {
            table: NormalizedTable {
                path_source: path_file.to_path_buf(),
                records: outcome.records,
            },
            cnt_rows_total: df.height() as u64,
            cnt_rows_matched: df_matched.height() as u64,
            cnt_rejected_by_reason: outcome.cnt_rejected_by_reason,
        })
    }
}

fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, 8),
    }
}
