//! Shared XLSX specification models and errors.

use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PageSpecification

/// Printed page setup, margins in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecPageSetup {
    /// Excel paper size code.
    pub paper_size: u8,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
    pub margin_header_mm: f64,
    pub margin_footer_mm: f64,
}

/// One fixed grid of label cells, ready to be written as a worksheet.
///
/// `cells` is row-major and must hold exactly `n_rows * n_cols` entries;
/// an empty string writes a blank bordered cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecLabelSheet {
    /// Requested sheet name (sanitized on write).
    pub sheet_name: String,
    /// Total rows across all pages.
    pub n_rows: usize,
    /// Columns per row.
    pub n_cols: usize,
    /// Rows per printed page; a page break follows every block.
    pub n_rows_per_page: usize,
    /// Cell width in millimetres.
    pub width_cell_mm: f64,
    /// Cell height in millimetres.
    pub height_cell_mm: f64,
    /// Cell text, row-major.
    pub cells: Vec<String>,
    /// Format applied to every cell.
    pub fmt_cell: SpecCellFormat,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// What was written for one label sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSummary {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    pub n_rows: usize,
    pub n_cols: usize,
    pub n_pages: usize,
}

/// Writer report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheets written so far.
    pub sheets: Vec<SpecSheetSummary>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        tracing::warn!("{}", msg.as_ref());
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Spreadsheet loading failures.
#[derive(Debug, Error)]
pub enum ReadXlsxError {
    /// Workbook could not be opened or parsed.
    #[error("failed to open workbook {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    /// Workbook has no worksheet to read.
    #[error("workbook {} has no worksheet", .0.display())]
    NoWorksheet(PathBuf),
    /// Named worksheet is missing or unreadable.
    #[error("failed to read worksheet `{sheet_name}` in {}: {source}", path.display())]
    Sheet {
        path: PathBuf,
        sheet_name: String,
        #[source]
        source: calamine::Error,
    },
    /// Cell data could not be assembled into a frame.
    #[error("failed to build frame: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

/// Label workbook writing failures.
#[derive(Debug, Error)]
pub enum WriteXlsxError {
    /// Sheet shape does not match its cell payload.
    #[error("{0}")]
    InvalidSheet(String),
    /// Writer was already closed.
    #[error("Cannot write after close().")]
    Closed,
    /// Row/column index exceeds worksheet limits.
    #[error("{0}")]
    IndexOverflow(String),
    /// Underlying workbook error.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
