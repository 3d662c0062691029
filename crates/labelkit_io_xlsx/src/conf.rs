//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecPageSetup};

/// Spreadsheet extensions accepted by the loader (lowercase, without dot).
pub const TUP_SPREADSHEET_EXTENSIONS: [&str; 3] = ["xls", "xlsx", "xlsm"];
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Excel paper size code for A4.
pub const N_PAPER_SIZE_A4: u8 = 9;
/// Rows in one Excel worksheet.
pub const N_XLSX_ROWS_MAX: usize = 1_048_576;
/// Upper bound of manual page breaks Excel accepts per worksheet.
pub const N_PAGE_BREAKS_MAX: usize = 1023;

const C_LABEL_FONT_NAME: &str = "Times New Roman";

/// A4 portrait page with the margins used by the label stock.
pub fn derive_default_page_setup() -> SpecPageSetup {
    SpecPageSetup {
        paper_size: N_PAPER_SIZE_A4,
        margin_left_mm: 10.0,
        margin_right_mm: 7.5,
        margin_top_mm: 7.5,
        margin_bottom_mm: 0.0,
        margin_header_mm: 0.0,
        margin_footer_mm: 0.0,
    }
}

fn derive_base_label_format() -> SpecCellFormat {
    SpecCellFormat {
        font_name: Some(C_LABEL_FONT_NAME.to_string()),
        bold: Some(true),
        valign: Some("vcenter".to_string()),
        border: Some(1),
        text_wrap: Some(true),
        ..Default::default()
    }
}

/// Small front-face label: 10 pt, left aligned.
pub fn derive_front_label_format() -> SpecCellFormat {
    derive_base_label_format().with_(SpecCellFormat {
        font_size: Some(10),
        align: Some("left".to_string()),
        ..Default::default()
    })
}

/// Large side-face label: 14 pt, centered.
pub fn derive_side_label_format() -> SpecCellFormat {
    derive_base_label_format().with_(SpecCellFormat {
        font_size: Some(14),
        align: Some("center".to_string()),
        ..Default::default()
    })
}
