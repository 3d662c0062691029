//! Directory enumeration and file selection.

use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{ReportScan, ReportScanBuilder};
use crate::spec::{ScanDirError, SpecScanOptions};
use crate::util::{SpecScanPatterns, is_depth_within_limit, is_hidden_name};

#[derive(Debug, Clone)]
struct SpecScanEntry {
    path_entry: PathBuf,
    name_entry: String,
}

#[derive(Debug)]
struct SpecScanContext {
    spec_scan_options: SpecScanOptions,
    spec_scan_pats: SpecScanPatterns,
    builder_scan_report: ReportScanBuilder,
}

/// List files under `dir_scan`.
///
/// Entries are read directly from the filesystem and returned in a
/// deterministic order: files of a directory sorted by name, followed by
/// the contents of its sub-directories (also sorted by name) when
/// [`SpecScanOptions::depth_limit`] allows descending.
///
/// Returns [`ScanDirError`] only for setup failures (bad options, missing
/// directory). Unreadable entries are reported as warnings.
pub fn scan_dir<P>(
    dir_scan: P,
    spec_scan_options: SpecScanOptions,
) -> Result<ReportScan, ScanDirError>
where
    P: AsRef<Path>,
{
    if spec_scan_options.depth_limit == Some(0) {
        return Err(ScanDirError::InvalidDepthLimit(
            "Arg `depth_limit` must be >= 1 or None.".to_string(),
        ));
    }

    let path_dir_scan = dir_scan.as_ref().to_path_buf();
    if !path_dir_scan.is_dir() {
        return Err(ScanDirError::SourceNotDirectory(path_dir_scan));
    }

    let spec_scan_pats = SpecScanPatterns::from_raw(
        spec_scan_options.patterns_include_files.as_deref(),
        spec_scan_options.patterns_exclude_files.as_deref(),
        spec_scan_options.rule_pattern,
    )?;

    let mut spec_scan_ctx = SpecScanContext {
        spec_scan_options,
        spec_scan_pats,
        builder_scan_report: ReportScanBuilder::default(),
    };

    walk_directory(&path_dir_scan, 1, &mut spec_scan_ctx);
    let report = spec_scan_ctx.builder_scan_report.build();
    tracing::debug!("{report} root={}", path_dir_scan.display());
    Ok(report)
}

fn walk_directory(path_root: &Path, n_depth: usize, spec_scan_ctx: &mut SpecScanContext) {
    let mut l_dirs: Vec<SpecScanEntry> = Vec::new();
    let mut l_files: Vec<SpecScanEntry> = Vec::new();

    let iter_entries = match fs::read_dir(path_root) {
        Ok(iter) => iter,
        Err(e) => {
            spec_scan_ctx.builder_scan_report.add_warning(format!(
                "Failed to read directory {} ({e})",
                path_root.display()
            ));
            return;
        }
    };

    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) => {
                spec_scan_ctx.builder_scan_report.add_warning(format!(
                    "Failed to read directory entry under {} ({e})",
                    path_root.display()
                ));
                continue;
            }
        };

        spec_scan_ctx.builder_scan_report.add_scanned();
        let path_entry = entry.path();
        let c_name = entry.file_name().to_string_lossy().to_string();

        if !spec_scan_ctx.spec_scan_options.if_include_hidden && is_hidden_name(&c_name) {
            spec_scan_ctx.builder_scan_report.add_skipped();
            continue;
        }

        // `Path::is_dir`/`is_file` follow symlinks, so linked files are listed too.
        if path_entry.is_dir() {
            l_dirs.push(SpecScanEntry {
                path_entry,
                name_entry: c_name,
            });
        } else if path_entry.is_file() {
            l_files.push(SpecScanEntry {
                path_entry,
                name_entry: c_name,
            });
        } else {
            spec_scan_ctx.builder_scan_report.add_skipped();
            spec_scan_ctx
                .builder_scan_report
                .add_warning(format!("Special file skipped: {}", path_entry.display()));
        }
    }

    l_dirs.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));
    l_files.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));

    for _file_entry in l_files {
        if spec_scan_ctx
            .spec_scan_pats
            .should_exclude(&_file_entry.name_entry)
        {
            spec_scan_ctx.builder_scan_report.add_skipped();
            continue;
        }
        spec_scan_ctx
            .builder_scan_report
            .add_file(_file_entry.path_entry);
    }

    let depth_limit = spec_scan_ctx.spec_scan_options.depth_limit;
    for _dir_entry in l_dirs {
        if is_depth_within_limit(n_depth + 1, depth_limit) {
            walk_directory(&_dir_entry.path_entry, n_depth + 1, spec_scan_ctx);
        } else {
            spec_scan_ctx.builder_scan_report.add_skipped();
        }
    }
}
