//! Label-sheet writer kernel: fixed grids of text cells into a printable workbook.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::conf::N_PAGE_BREAKS_MAX;
use crate::spec::{
    SpecCellFormat, SpecLabelSheet, SpecPageSetup, SpecSheetSummary, SpecXlsxReport,
    WriteXlsxError,
};
use crate::util::{
    convert_mm_to_column_width, convert_mm_to_inches, convert_mm_to_points,
    create_sheet_identifier, derive_page_break_rows, sanitize_sheet_name,
};

/// Stateful workbook writer.
pub struct LabelXlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    page_setup: SpecPageSetup,
    set_sheet_names_existing: BTreeSet<String>,
    report: SpecXlsxReport,
    if_closed: bool,
}

impl LabelXlsxWriter {
    /// Create writer bound to output path and page setup.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, page_setup: SpecPageSetup) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            page_setup,
            set_sheet_names_existing: BTreeSet::new(),
            report: SpecXlsxReport::default(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return snapshot of the write report.
    pub fn report(&self) -> SpecXlsxReport {
        self.report.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), WriteXlsxError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        tracing::debug!("Saved {}", self.path_file_out.display());
        Ok(())
    }

    /// Write one label grid as its own worksheet.
    pub fn write_label_sheet(
        &mut self,
        label_sheet: &SpecLabelSheet,
    ) -> Result<(), WriteXlsxError> {
        if self.if_closed {
            return Err(WriteXlsxError::Closed);
        }
        validate_label_sheet(label_sheet)?;

        let sheet_name_clean = sanitize_sheet_name(&label_sheet.sheet_name, "_");
        if sheet_name_clean != label_sheet.sheet_name {
            self.report.warn(format!(
                "Sheet name `{}` sanitized to `{sheet_name_clean}`.",
                label_sheet.sheet_name
            ));
        }
        let sheet_name_unique = self.derive_unique_sheet_name(&sheet_name_clean);

        let l_page_breaks =
            derive_page_break_rows(label_sheet.n_rows, label_sheet.n_rows_per_page);
        if l_page_breaks.len() > N_PAGE_BREAKS_MAX {
            self.report.warn(format!(
                "Sheet `{sheet_name_unique}` needs {} page breaks; only the first {N_PAGE_BREAKS_MAX} are kept.",
                l_page_breaks.len()
            ));
        }
        let l_page_breaks = l_page_breaks
            .into_iter()
            .take(N_PAGE_BREAKS_MAX)
            .map(cast_row_num)
            .collect::<Result<Vec<_>, _>>()?;

        let fmt_cell = derive_rust_xlsx_format(&label_sheet.fmt_cell);
        let page_setup = self.page_setup.clone();

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name_unique)?;
        apply_page_setup(worksheet, &page_setup);
        if !l_page_breaks.is_empty() {
            worksheet.set_page_breaks(&l_page_breaks)?;
        }

        let n_width_col = convert_mm_to_column_width(label_sheet.width_cell_mm);
        for n_idx_col in 0..label_sheet.n_cols {
            worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_col)?;
        }
        let n_height_row = convert_mm_to_points(label_sheet.height_cell_mm);
        for n_idx_row in 0..label_sheet.n_rows {
            worksheet.set_row_height(cast_row_num(n_idx_row)?, n_height_row)?;
        }

        for (n_idx_cell, c_text) in label_sheet.cells.iter().enumerate() {
            let n_idx_row = n_idx_cell / label_sheet.n_cols;
            let n_idx_col = n_idx_cell % label_sheet.n_cols;
            write_cell_with_format(worksheet, n_idx_row, n_idx_col, c_text, &fmt_cell)?;
        }

        self.report.sheets.push(SpecSheetSummary {
            sheet_name: sheet_name_unique,
            n_rows: label_sheet.n_rows,
            n_cols: label_sheet.n_cols,
            n_pages: label_sheet.n_rows.div_ceil(label_sheet.n_rows_per_page),
        });
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let mut n_idx_part = 1usize;
        loop {
            let candidate = create_sheet_identifier(name, n_idx_part);
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx_part += 1;
        }
    }
}

fn validate_label_sheet(label_sheet: &SpecLabelSheet) -> Result<(), WriteXlsxError> {
    if label_sheet.n_cols == 0 || label_sheet.n_rows_per_page == 0 {
        return Err(WriteXlsxError::InvalidSheet(format!(
            "Sheet `{}` must have n_cols >= 1 and n_rows_per_page >= 1.",
            label_sheet.sheet_name
        )));
    }
    if label_sheet.n_rows * label_sheet.n_cols != label_sheet.cells.len() {
        return Err(WriteXlsxError::InvalidSheet(format!(
            "Sheet `{}` has {} cells; expected {} x {}.",
            label_sheet.sheet_name,
            label_sheet.cells.len(),
            label_sheet.n_rows,
            label_sheet.n_cols
        )));
    }
    Ok(())
}

fn apply_page_setup(worksheet: &mut Worksheet, page_setup: &SpecPageSetup) {
    worksheet.set_paper_size(page_setup.paper_size);
    worksheet.set_portrait();
    worksheet.set_margins(
        convert_mm_to_inches(page_setup.margin_left_mm),
        convert_mm_to_inches(page_setup.margin_right_mm),
        convert_mm_to_inches(page_setup.margin_top_mm),
        convert_mm_to_inches(page_setup.margin_bottom_mm),
        convert_mm_to_inches(page_setup.margin_header_mm),
        convert_mm_to_inches(page_setup.margin_footer_mm),
    );
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    text: &str,
    format: &Format,
) -> Result<(), WriteXlsxError> {
    if text.is_empty() {
        worksheet.write_blank(cast_row_num(row_idx)?, cast_col_num(col_idx)?, format)?;
    } else {
        worksheet.write_string_with_format(
            cast_row_num(row_idx)?,
            cast_col_num(col_idx)?,
            text,
            format,
        )?;
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, WriteXlsxError> {
    u32::try_from(value)
        .map_err(|_| WriteXlsxError::IndexOverflow(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, WriteXlsxError> {
    u16::try_from(value)
        .map_err(|_| WriteXlsxError::IndexOverflow(format!("column index overflow: {value}")))
}

#[cfg(test)]
mod tests {
    use calamine::{Reader, open_workbook_auto};

    use super::LabelXlsxWriter;
    use crate::conf::{derive_default_page_setup, derive_front_label_format};
    use crate::spec::{SpecLabelSheet, WriteXlsxError};

    fn make_sheet(name: &str, n_rows: usize, n_cols: usize) -> SpecLabelSheet {
        let cells = (0..n_rows * n_cols)
            .map(|n| {
                if n % 3 == 0 {
                    String::new()
                } else {
                    format!("Hostname: h{n}\nIP: 10.0.0.{n}")
                }
            })
            .collect();
        SpecLabelSheet {
            sheet_name: name.to_string(),
            n_rows,
            n_cols,
            n_rows_per_page: 2,
            width_cell_mm: 48.5,
            height_cell_mm: 20.0,
            cells,
            fmt_cell: derive_front_label_format(),
        }
    }

    #[test]
    fn test_write_label_sheet_round_trips_cell_text() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("labels.xlsx");

        let mut writer = LabelXlsxWriter::new(path.clone(), derive_default_page_setup());
        writer
            .write_label_sheet(&make_sheet("front_labels", 4, 2))
            .expect("write sheet");
        writer.close().expect("close");
        writer.close().expect("close is idempotent");

        let report = writer.report();
        assert_eq!(report.sheets.len(), 1);
        assert_eq!(report.sheets[0].n_pages, 2);

        let mut workbook = open_workbook_auto(&path).expect("open");
        let range = workbook.worksheet_range("front_labels").expect("range");
        assert_eq!(
            range.get_value((0, 1)).map(|v| v.to_string()),
            Some("Hostname: h1\nIP: 10.0.0.1".to_string())
        );
        assert_eq!(
            range.get_value((3, 1)).map(|v| v.to_string()),
            Some("Hostname: h7\nIP: 10.0.0.7".to_string())
        );
    }

    #[test]
    fn test_write_label_sheet_rejects_shape_mismatch() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut writer =
            LabelXlsxWriter::new(tmp.path().join("bad.xlsx"), derive_default_page_setup());
        let mut sheet = make_sheet("front", 2, 2);
        sheet.cells.pop();

        let err = writer.write_label_sheet(&sheet).expect_err("shape mismatch");
        assert!(matches!(err, WriteXlsxError::InvalidSheet(_)));
    }

    #[test]
    fn test_duplicate_and_illegal_sheet_names() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut writer =
            LabelXlsxWriter::new(tmp.path().join("names.xlsx"), derive_default_page_setup());
        writer
            .write_label_sheet(&make_sheet("labels", 2, 2))
            .expect("first");
        writer
            .write_label_sheet(&make_sheet("labels", 2, 2))
            .expect("second");
        writer
            .write_label_sheet(&make_sheet("a/b", 2, 2))
            .expect("third");

        let report = writer.report();
        let l_names: Vec<_> = report.sheets.iter().map(|s| s.sheet_name.as_str()).collect();
        assert_eq!(l_names, vec!["labels", "labels_1", "a_b"]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_write_after_close_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut writer =
            LabelXlsxWriter::new(tmp.path().join("closed.xlsx"), derive_default_page_setup());
        writer
            .write_label_sheet(&make_sheet("labels", 2, 2))
            .expect("write");
        writer.close().expect("close");

        let err = writer
            .write_label_sheet(&make_sheet("more", 2, 2))
            .expect_err("closed");
        assert!(matches!(err, WriteXlsxError::Closed));
    }
}
