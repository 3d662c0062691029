//! Record, label and page-grid models.

use std::path::PathBuf;

use crate::normalize::{validate_address_block, validate_host_id, validate_zone};
use crate::spec::{EnumLabelKind, EnumRejectReason, SpecLabelValues};

////////////////////////////////////////////////////////////////////////////////
// #region RawRow

/// One spreadsheet row as ordered `column -> cell` pairs; `None` is an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecRawRow {
    cells: Vec<(String, Option<String>)>,
}

impl SpecRawRow {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }

    /// `true` when the row has a column named `column` (even if the cell is empty).
    pub fn has_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(c_name, _)| c_name == column)
    }

    /// Cell value, `None` for an empty cell or an unknown column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c_name, _)| c_name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Cell value stringified; empty cells and unknown columns give `""`.
    pub fn get_text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(c_name, value)| (c_name.as_str(), value.as_deref()))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region NormalizedRecord

/// Validated host record. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedRecord {
    host_id: String,
    address_block: String,
    zone: String,
}

impl NormalizedRecord {
    /// Validate `hostname -> address block -> zone`, stopping at the first failure.
    pub fn try_new(
        host_id: impl Into<String>,
        address_block: impl Into<String>,
        zone: impl Into<String>,
    ) -> Result<Self, EnumRejectReason> {
        let host_id = host_id.into();
        validate_host_id(&host_id)?;
        let address_block = address_block.into();
        validate_address_block(&address_block)?;
        let zone = zone.into();
        validate_zone(&zone)?;
        Ok(Self::from_validated(host_id, address_block, zone))
    }

    pub(crate) fn from_validated(host_id: String, address_block: String, zone: String) -> Self {
        Self {
            host_id,
            address_block,
            zone,
        }
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    pub fn address_block(&self) -> &str {
        &self.address_block
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }
}

/// Accepted records of one source file, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTable {
    /// File the records were read from.
    pub path_source: PathBuf,
    pub records: Vec<NormalizedRecord>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LabelRecord

/// Display-ready label: ordered `label name -> value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    kind: EnumLabelKind,
    fields: Vec<(String, String)>,
}

impl LabelRecord {
    /// Label of `kind` for one record.
    pub fn from_record(
        kind: EnumLabelKind,
        record: &NormalizedRecord,
        label_values: &SpecLabelValues,
    ) -> Self {
        Self::build(
            kind,
            record.host_id(),
            record.address_block(),
            record.zone(),
            label_values,
        )
    }

    /// Same line layout as a real label, with empty host/address/zone values
    /// and empty constants. Used to print padding cells.
    pub fn blank(kind: EnumLabelKind, label_values: &SpecLabelValues) -> Self {
        let label_values_blank = SpecLabelValues {
            project_number: String::new(),
            weight: String::new(),
            ..label_values.clone()
        };
        Self::build(kind, "", "", "", &label_values_blank)
    }

    fn build(
        kind: EnumLabelKind,
        host_id: &str,
        address_block: &str,
        zone: &str,
        label_values: &SpecLabelValues,
    ) -> Self {
        let mut fields = vec![
            (label_values.name_hostname.clone(), host_id.to_string()),
            (label_values.name_ip.clone(), address_block.to_string()),
            (
                label_values.name_project_number.clone(),
                label_values.project_number.clone(),
            ),
        ];
        if kind == EnumLabelKind::Side {
            fields.push((label_values.name_zone.clone(), zone.to_string()));
            fields.push((label_values.name_weight.clone(), label_values.weight.clone()));
        }
        Self { kind, fields }
    }

    pub fn kind(&self) -> EnumLabelKind {
        self.kind
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c_name, _)| c_name == name)
            .map(|(_, value)| value.as_str())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PageGrid

/// One grid slot: a label or explicit padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumGridCell {
    Label(LabelRecord),
    Placeholder,
}

impl EnumGridCell {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    pub fn as_label(&self) -> Option<&LabelRecord> {
        match self {
            Self::Label(label) => Some(label),
            Self::Placeholder => None,
        }
    }
}

/// Page-local coordinates of a linear, row-major cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecCellPosition {
    pub page_idx: usize,
    pub row_in_page: usize,
    pub col_in_page: usize,
}

impl SpecCellPosition {
    pub fn from_index(n_idx_cell: usize, kind: EnumLabelKind) -> Self {
        let n_row_global = n_idx_cell / kind.n_cols();
        Self {
            page_idx: n_row_global / kind.n_rows_per_page(),
            row_in_page: n_row_global % kind.n_rows_per_page(),
            col_in_page: n_idx_cell % kind.n_cols(),
        }
    }

    /// Row index across all pages.
    pub fn row_global(&self, kind: EnumLabelKind) -> usize {
        self.page_idx * kind.n_rows_per_page() + self.row_in_page
    }

    /// Inverse of [`Self::from_index`].
    pub fn to_index(&self, kind: EnumLabelKind) -> usize {
        self.row_global(kind) * kind.n_cols() + self.col_in_page
    }
}

/// Fully padded label grid; `n_rows * n_cols == cells.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGrid {
    kind: EnumLabelKind,
    n_rows: usize,
    cells: Vec<EnumGridCell>,
}

impl PageGrid {
    /// Only the pagination engine builds grids, so the shape invariant is
    /// established there.
    pub(crate) fn from_cells(kind: EnumLabelKind, n_rows: usize, cells: Vec<EnumGridCell>) -> Self {
        debug_assert_eq!(n_rows * kind.n_cols(), cells.len());
        Self {
            kind,
            n_rows,
            cells,
        }
    }

    pub fn kind(&self) -> EnumLabelKind {
        self.kind
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.kind.n_cols()
    }

    pub fn n_pages(&self) -> usize {
        self.n_rows / self.kind.n_rows_per_page()
    }

    pub fn cells(&self) -> &[EnumGridCell] {
        &self.cells
    }

    pub fn n_labels(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_placeholder()).count()
    }

    pub fn n_placeholders(&self) -> usize {
        self.cells.iter().filter(|c| c.is_placeholder()).count()
    }

    pub fn cell_at(&self, position: SpecCellPosition) -> Option<&EnumGridCell> {
        if position.row_in_page >= self.kind.n_rows_per_page()
            || position.col_in_page >= self.kind.n_cols()
        {
            return None;
        }
        self.cells.get(position.to_index(self.kind))
    }

    /// Cells with their page coordinates, in fill order.
    pub fn iter_positioned(&self) -> impl Iterator<Item = (SpecCellPosition, &EnumGridCell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(n_idx, cell)| (SpecCellPosition::from_index(n_idx, self.kind), cell))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_lookup() {
        let row = SpecRawRow::from_pairs([("a", Some("1")), ("b", None::<&str>)]);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), None);
        assert!(row.has_column("b"));
        assert!(!row.has_column("c"));
        assert_eq!(row.get_text("c"), "");
        assert_eq!(row.iter().count(), 2);
    }

    #[test]
    fn record_try_new_reports_first_failure() {
        assert_eq!(
            NormalizedRecord::try_new("", "bad", ""),
            Err(EnumRejectReason::Hostname)
        );
        assert_eq!(
            NormalizedRecord::try_new("web-01", "bad", ""),
            Err(EnumRejectReason::AddressBlock)
        );
        assert_eq!(
            NormalizedRecord::try_new("web-01", "10.0.0.0/8", ""),
            Err(EnumRejectReason::Zone)
        );
        let record = NormalizedRecord::try_new("web-01", "10.0.0.0/8", "DC-1").expect("valid");
        assert_eq!(record.host_id(), "web-01");
        assert_eq!(record.address_block(), "10.0.0.0/8");
        assert_eq!(record.zone(), "DC-1");
    }

    #[test]
    fn label_fields_by_kind() {
        let values = SpecLabelValues::default();
        let record = NormalizedRecord::try_new("web-01", "10.0.0.0/8", "DC-1").expect("valid");

        let front = LabelRecord::from_record(EnumLabelKind::Front, &record, &values);
        let l_names: Vec<_> = front.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(l_names, vec!["Hostname", "IP", "Project Number"]);

        let side = LabelRecord::from_record(EnumLabelKind::Side, &record, &values);
        assert_eq!(side.get("Zone"), Some("DC-1"));
        assert_eq!(side.get("Weight"), Some("25 kg"));
        assert_eq!(side.fields().len(), 5);

        let blank = LabelRecord::blank(EnumLabelKind::Side, &values);
        assert!(blank.fields().iter().all(|(_, v)| v.is_empty()));
        assert_eq!(blank.fields().len(), 5);
    }

    #[test]
    fn cell_position_round_trip_across_pages() {
        let kind = EnumLabelKind::Front;
        let position = SpecCellPosition::from_index(57, kind);
        assert_eq!(
            position,
            SpecCellPosition {
                page_idx: 1,
                row_in_page: 0,
                col_in_page: 1
            }
        );
        assert_eq!(position.row_global(kind), 14);
        assert_eq!(position.to_index(kind), 57);

        let position = SpecCellPosition::from_index(13, EnumLabelKind::Side);
        assert_eq!(position.page_idx, 0);
        assert_eq!(position.row_in_page, 6);
        assert_eq!(position.col_in_page, 1);
    }
}
