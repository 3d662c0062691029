//! Page grids -> printable label workbook.

use std::fs;
use std::path::Path;

use labelkit_io_xlsx::{
    LabelXlsxWriter, SpecLabelSheet, SpecXlsxReport, derive_default_page_setup,
    derive_front_label_format, derive_side_label_format,
};

use crate::paginate::SpecLabelLayout;
use crate::record::{EnumGridCell, LabelRecord, PageGrid};
use crate::spec::{EnumLabelKind, LabelError, SpecLabelValues};

/// Cell text: one `Name: value` line per label field.
pub fn format_cell_text(label: &LabelRecord) -> String {
    label
        .fields()
        .iter()
        .map(|(c_name, c_value)| format!("{c_name}: {c_value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn derive_label_sheet(
    grid: &PageGrid,
    label_values: &SpecLabelValues,
    if_render_placeholder_template: bool,
) -> SpecLabelSheet {
    let kind = grid.kind();
    let c_placeholder = if if_render_placeholder_template {
        format_cell_text(&LabelRecord::blank(kind, label_values))
    } else {
        String::new()
    };

    let cells = grid
        .cells()
        .iter()
        .map(|cell| match cell {
            EnumGridCell::Label(label) => format_cell_text(label),
            EnumGridCell::Placeholder => c_placeholder.clone(),
        })
        .collect();

    SpecLabelSheet {
        sheet_name: kind.sheet_name().to_string(),
        n_rows: grid.n_rows(),
        n_cols: grid.n_cols(),
        n_rows_per_page: kind.n_rows_per_page(),
        width_cell_mm: kind.width_cell_mm(),
        height_cell_mm: kind.height_cell_mm(),
        cells,
        fmt_cell: match kind {
            EnumLabelKind::Front => derive_front_label_format(),
            EnumLabelKind::Side => derive_side_label_format(),
        },
    }
}

/// Write both grids of `layout` to one workbook at `path_file_out`.
///
/// The front grid goes to the first worksheet, the side grid to the second.
/// Missing parent directories are created.
pub fn render_document(
    layout: &SpecLabelLayout,
    path_file_out: &Path,
    label_values: &SpecLabelValues,
    if_render_placeholder_template: bool,
) -> Result<SpecXlsxReport, LabelError> {
    if let Some(path_dir) = path_file_out.parent()
        && !path_dir.as_os_str().is_empty()
    {
        fs::create_dir_all(path_dir)?;
    }

    let mut writer = LabelXlsxWriter::new(path_file_out.to_path_buf(), derive_default_page_setup());
    for grid in layout.grids() {
        let label_sheet = derive_label_sheet(grid, label_values, if_render_placeholder_template);
        writer.write_label_sheet(&label_sheet)?;
    }
    writer.close()?;

    tracing::info!("Wrote label document {}", writer.file_out());
    Ok(writer.report())
}

#[cfg(test)]
mod tests {
    use calamine::{Reader, Xlsx, open_workbook};

    use super::*;
    use crate::paginate::paginate;
    use crate::record::NormalizedRecord;

    fn records(n: usize) -> Vec<NormalizedRecord> {
        (0..n)
            .map(|i| {
                NormalizedRecord::try_new(format!("h{i}"), format!("10.0.0.{i}/32"), "DC-1")
                    .expect("valid")
            })
            .collect()
    }

    #[test]
    fn cell_text_lists_fields_in_order() {
        let values = SpecLabelValues::default();
        let record = NormalizedRecord::try_new("web-01", "10.1.0.0/16", "DC-2").expect("valid");
        assert_eq!(
            format_cell_text(&LabelRecord::from_record(EnumLabelKind::Front, &record, &values)),
            "Hostname: web-01\nIP: 10.1.0.0/16\nProject Number: 1"
        );
        assert_eq!(
            format_cell_text(&LabelRecord::from_record(EnumLabelKind::Side, &record, &values)),
            "Hostname: web-01\nIP: 10.1.0.0/16\nProject Number: 1\nZone: DC-2\nWeight: 25 kg"
        );
    }

    #[test]
    fn placeholder_rendering_modes() {
        let values = SpecLabelValues::default();
        let layout = paginate(&records(1), 1, &values).expect("layout");

        let sheet = derive_label_sheet(&layout.front, &values, true);
        assert_eq!(sheet.cells.len(), 56);
        assert_eq!(sheet.cells[1], "Hostname: \nIP: \nProject Number: ");

        let sheet = derive_label_sheet(&layout.side, &values, false);
        assert_eq!(sheet.cells.len(), 14);
        assert_eq!(sheet.cells[1], "");
        assert_eq!(sheet.n_rows_per_page, 7);
    }

    #[test]
    fn render_document_writes_two_sheets() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("out").join("labels.xlsx");
        let values = SpecLabelValues::default();
        let layout = paginate(&records(5), 1, &values).expect("layout");

        let report = render_document(&layout, &path, &values, false).expect("render");
        assert_eq!(report.sheets.len(), 2);
        assert_eq!(report.sheets[0].n_pages, 1);

        let mut workbook: Xlsx<_> = open_workbook(&path).expect("open");
        assert_eq!(
            workbook.sheet_names(),
            vec!["front_labels".to_string(), "side_labels".to_string()]
        );

        let range = workbook.worksheet_range("front_labels").expect("front");
        assert_eq!(
            range.get_value((1, 0)).map(|v| v.to_string()),
            Some("Hostname: h4\nIP: 10.0.0.4/32\nProject Number: 1".to_string())
        );

        let range = workbook.worksheet_range("side_labels").expect("side");
        assert_eq!(
            range.get_value((0, 1)).map(|v| v.to_string()),
            Some(
                "Hostname: h1\nIP: 10.0.0.1/32\nProject Number: 1\nZone: DC-1\nWeight: 25 kg"
                    .to_string()
            )
        );
    }
}
