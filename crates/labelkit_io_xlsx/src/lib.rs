//! `labelkit_io_xlsx` v1:
//! Spreadsheet read/write kernel for label generation.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options/errors
//! - `util`   : pure helper functions
//! - `reader` : workbook -> DataFrame loader
//! - `writer` : label-sheet workbook writer
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_XLSX_ROWS_MAX, TUP_EXCEL_ILLEGAL, TUP_SPREADSHEET_EXTENSIONS,
    derive_default_page_setup, derive_front_label_format, derive_side_label_format,
};
pub use reader::{is_supported_spreadsheet, read_sheet_dataframe};
pub use spec::{
    ReadXlsxError, SpecCellFormat, SpecLabelSheet, SpecPageSetup, SpecSheetSummary,
    SpecXlsxReport, WriteXlsxError,
};
pub use util::{derive_page_break_rows, derive_unique_column_names, sanitize_sheet_name};
pub use writer::LabelXlsxWriter;
