//! `labelkit_label` v1:
//! Host inventory -> printed label sheets.
//!
//! Pipeline stages, leaf-first:
//! - `filter`    : composable column predicates -> row mask
//! - `normalize` : per-row validation into `NormalizedRecord`
//! - `merge`     : per-file tables -> one ordered table
//! - `paginate`  : repeat expansion and fixed-grid page layout
//! - `render`    : page grids -> label workbook
//! - `pipeline`  : scan/load/filter/normalize/merge/paginate orchestration
//!
//! Shared models live in `spec` and `record`; run counters in `report`.
//! Scan options are re-exported from `labelkit_io_fs`.
pub mod filter;
pub mod merge;
pub mod normalize;
pub mod paginate;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod report;
pub mod spec;

pub use labelkit_io_fs::{EnumScanPatternMode, SpecScanOptions};

pub use filter::{SpecRowFilter, derive_server_type_column};
pub use merge::merge_tables;
pub use normalize::{is_valid_cidr, normalize_frame, normalize_row};
pub use paginate::{
    SpecExpandedLabels, SpecLabelLayout, build_page_grid, calculate_page_count, expand_records,
    paginate,
};
pub use pipeline::{LabelPipeline, ResultLabelRun};
pub use record::{
    EnumGridCell, LabelRecord, NormalizedRecord, NormalizedTable, PageGrid, SpecCellPosition,
    SpecRawRow,
};
pub use render::{format_cell_text, render_document};
pub use report::{ReportLabel, ReportLabelBuilder, SpecFileError};
pub use spec::{
    EnumLabelKind, EnumMatchMode, EnumRejectReason, LabelError, SpecColumnNames, SpecLabelOptions,
    SpecLabelValues,
};
