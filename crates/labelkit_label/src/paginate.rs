//! Repeat expansion and fixed-grid page layout.

use labelkit_io_xlsx::N_XLSX_ROWS_MAX;

use crate::record::{EnumGridCell, LabelRecord, NormalizedRecord, PageGrid};
use crate::spec::{EnumLabelKind, LabelError, SpecLabelValues};

/// Front and side label sequences, one entry per printed copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecExpandedLabels {
    pub front: Vec<LabelRecord>,
    pub side: Vec<LabelRecord>,
}

/// Both padded page grids of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLabelLayout {
    pub front: PageGrid,
    pub side: PageGrid,
}

impl SpecLabelLayout {
    pub fn grids(&self) -> [&PageGrid; 2] {
        [&self.front, &self.side]
    }
}

/// Repeat count below 1 means one copy.
pub fn clamp_repeat_count(repeat_count: i64) -> usize {
    usize::try_from(repeat_count.max(1)).unwrap_or(usize::MAX)
}

/// Label count for `n_records` x `n_repeat`, checked against the worksheet
/// row limit of both grids.
pub fn calculate_label_count(n_records: usize, n_repeat: usize) -> Result<usize, LabelError> {
    let err_capacity = |n_rows: Option<usize>| {
        let c_rows = n_rows.map_or_else(|| "more".to_string(), |n| n.to_string());
        LabelError::LabelCapacity(format!(
            "{n_records} records x {n_repeat} copies need {c_rows} worksheet rows; \
             at most {N_XLSX_ROWS_MAX} fit."
        ))
    };

    let n_labels = n_records
        .checked_mul(n_repeat)
        .ok_or_else(|| err_capacity(None))?;
    for kind in [EnumLabelKind::Front, EnumLabelKind::Side] {
        let n_rows =
            calculate_page_count(n_labels, kind.n_cells_per_page()) * kind.n_rows_per_page();
        if n_rows > N_XLSX_ROWS_MAX {
            return Err(err_capacity(Some(n_rows)));
        }
    }
    Ok(n_labels)
}

/// Reject a repeat count that cannot be printed even for a single record.
pub fn validate_repeat_count(repeat_count: i64) -> Result<usize, LabelError> {
    let n_repeat = clamp_repeat_count(repeat_count);
    calculate_label_count(1, n_repeat)?;
    Ok(n_repeat)
}

/// Emit `repeat_count` consecutive copies of each record's front and side label.
pub fn expand_records(
    records: &[NormalizedRecord],
    repeat_count: i64,
    label_values: &SpecLabelValues,
) -> Result<SpecExpandedLabels, LabelError> {
    let n_repeat = clamp_repeat_count(repeat_count);
    let n_labels = calculate_label_count(records.len(), n_repeat)?;
    let mut expanded = SpecExpandedLabels {
        front: Vec::with_capacity(n_labels),
        side: Vec::with_capacity(n_labels),
    };
    for record in records {
        let front = LabelRecord::from_record(EnumLabelKind::Front, record, label_values);
        let side = LabelRecord::from_record(EnumLabelKind::Side, record, label_values);
        expanded.front.extend(std::iter::repeat_n(front, n_repeat));
        expanded.side.extend(std::iter::repeat_n(side, n_repeat));
    }
    Ok(expanded)
}

/// Pages needed for `n_labels`; an empty sequence still yields one page.
pub fn calculate_page_count(n_labels: usize, n_cells_per_page: usize) -> usize {
    n_labels.div_ceil(n_cells_per_page.max(1)).max(1)
}

/// Lay labels row-major into whole pages of `kind`, padding the tail.
pub fn build_page_grid(kind: EnumLabelKind, labels: Vec<LabelRecord>) -> PageGrid {
    let n_pages = calculate_page_count(labels.len(), kind.n_cells_per_page());
    let n_cells = n_pages * kind.n_cells_per_page();

    let mut l_cells: Vec<EnumGridCell> = Vec::with_capacity(n_cells);
    l_cells.extend(labels.into_iter().map(EnumGridCell::Label));
    l_cells.resize(n_cells, EnumGridCell::Placeholder);

    PageGrid::from_cells(kind, n_pages * kind.n_rows_per_page(), l_cells)
}

/// Expand records and lay out both grids.
pub fn paginate(
    records: &[NormalizedRecord],
    repeat_count: i64,
    label_values: &SpecLabelValues,
) -> Result<SpecLabelLayout, LabelError> {
    let expanded = expand_records(records, repeat_count, label_values)?;
    let layout = SpecLabelLayout {
        front: build_page_grid(EnumLabelKind::Front, expanded.front),
        side: build_page_grid(EnumLabelKind::Side, expanded.side),
    };
    tracing::debug!(
        "Paginated {} records: front {} pages, side {} pages",
        records.len(),
        layout.front.n_pages(),
        layout.side.n_pages()
    );
    Ok(layout)
}
