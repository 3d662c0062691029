//! Label pipeline options, enums and top-level error types.

use std::fmt;
use std::path::PathBuf;

use labelkit_io_fs::{ScanDirError, SpecScanOptions};
use labelkit_io_xlsx::{ReadXlsxError, WriteXlsxError};
use polars::prelude::PolarsError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// How zone / server-type terms are matched against cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumMatchMode {
    /// Plain substring; terms are escaped.
    #[default]
    Literal,
    /// Each term is a regular expression alternative.
    Regex,
}

/// The two label grids. Each variant carries its fixed page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumLabelKind {
    /// Small front-face sticker, 4 x 14 per page.
    Front,
    /// Large side-face sticker, 2 x 7 per page.
    Side,
}

impl EnumLabelKind {
    pub const fn n_cols(self) -> usize {
        match self {
            Self::Front => 4,
            Self::Side => 2,
        }
    }

    pub const fn n_rows_per_page(self) -> usize {
        match self {
            Self::Front => 14,
            Self::Side => 7,
        }
    }

    pub const fn n_cells_per_page(self) -> usize {
        self.n_cols() * self.n_rows_per_page()
    }

    pub const fn width_cell_mm(self) -> f64 {
        match self {
            Self::Front => 48.5,
            Self::Side => 97.0,
        }
    }

    pub const fn height_cell_mm(self) -> f64 {
        match self {
            Self::Front => 20.0,
            Self::Side => 40.0,
        }
    }

    /// Worksheet name used by the renderer.
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::Front => "front_labels",
            Self::Side => "side_labels",
        }
    }
}

/// Which normalization check rejected a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumRejectReason {
    Hostname,
    AddressBlock,
    Zone,
}

impl fmt::Display for EnumRejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_name = match self {
            Self::Hostname => "hostname",
            Self::AddressBlock => "address_block",
            Self::Zone => "zone",
        };
        write!(f, "{c_name}")
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OptionStructs

/// Header names of the inventory columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnNames {
    /// Type/category column (zone filter).
    pub col_type: String,
    /// Node-name column (node filter and record zone).
    pub col_node_name: String,
    /// Free-text description column (server-type filter).
    pub col_description: String,
    /// Hostname column.
    pub col_hostname: String,
    /// Subnet column (CIDR).
    pub col_subnet: String,
}

impl Default for SpecColumnNames {
    fn default() -> Self {
        Self {
            col_type: "Тип".to_string(),
            col_node_name: "Имя узла".to_string(),
            col_description: "Описание".to_string(),
            col_hostname: "Хостнейм".to_string(),
            col_subnet: "Подсеть".to_string(),
        }
    }
}

/// Label line names and the constant values printed on every label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLabelValues {
    pub name_hostname: String,
    pub name_ip: String,
    pub name_project_number: String,
    pub name_zone: String,
    pub name_weight: String,
    /// Printed project number.
    pub project_number: String,
    /// Printed weight (side labels only).
    pub weight: String,
}

impl Default for SpecLabelValues {
    fn default() -> Self {
        Self {
            name_hostname: "Hostname".to_string(),
            name_ip: "IP".to_string(),
            name_project_number: "Project Number".to_string(),
            name_zone: "Zone".to_string(),
            name_weight: "Weight".to_string(),
            project_number: "1".to_string(),
            weight: "25 kg".to_string(),
        }
    }
}

/// Input options for [`crate::pipeline::LabelPipeline`].
#[derive(Debug, Clone)]
pub struct SpecLabelOptions {
    /// Directory holding the inventory spreadsheets.
    pub scan_path: PathBuf,
    /// Directory the label document is written to.
    pub export_path: PathBuf,
    /// Zone names matched against the type column (empty = inactive).
    pub zone_filter: Vec<String>,
    /// Exact node names (empty = inactive).
    pub node_filter: Vec<String>,
    /// Server-type strings searched in the description column (empty = inactive).
    pub server_type_filter: Vec<String>,
    /// Label copies per record; values below 1 are treated as 1.
    pub repeat_count: i64,
    /// Zone term matching mode.
    pub rule_match_zone: EnumMatchMode,
    /// Server-type term matching mode.
    pub rule_match_server_type: EnumMatchMode,
    /// Inventory header names.
    pub columns: SpecColumnNames,
    /// Label text configuration.
    pub label_values: SpecLabelValues,
    /// Worksheet to read; `None` reads the first sheet.
    pub sheet_name: Option<String>,
    /// Maximum worker threads for file loading; `None` picks from CPU count.
    pub num_workers_max: Option<usize>,
    /// Directory scan options.
    pub scan_options: SpecScanOptions,
    /// Output document file name inside `export_path`.
    pub file_name_out: String,
    /// Render padding cells as empty label templates instead of blank cells.
    pub if_render_placeholder_template: bool,
}

impl Default for SpecLabelOptions {
    fn default() -> Self {
        let path_cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            scan_path: path_cwd.clone(),
            export_path: path_cwd,
            zone_filter: Vec::new(),
            node_filter: Vec::new(),
            server_type_filter: Vec::new(),
            repeat_count: 1,
            rule_match_zone: EnumMatchMode::Literal,
            rule_match_server_type: EnumMatchMode::Literal,
            columns: SpecColumnNames::default(),
            label_values: SpecLabelValues::default(),
            sheet_name: None,
            num_workers_max: Some(1),
            scan_options: SpecScanOptions::default(),
            file_name_out: "labels.xlsx".to_string(),
            if_render_placeholder_template: true,
        }
    }
}

impl SpecLabelOptions {
    /// Full output document path.
    pub fn path_file_out(&self) -> PathBuf {
        self.export_path.join(&self.file_name_out)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Top-level label pipeline failures.
#[derive(Debug, Error)]
pub enum LabelError {
    /// Invalid zone/server-type pattern.
    #[error("{0}")]
    InvalidPattern(String),
    /// Expanded labels do not fit into one worksheet.
    #[error("{0}")]
    LabelCapacity(String),
    /// A column the pipeline needs is absent from the sheet.
    #[error("missing column `{0}`")]
    MissingColumn(String),
    /// Directory scan setup failure.
    #[error(transparent)]
    Scan(#[from] ScanDirError),
    /// Spreadsheet loading failure.
    #[error(transparent)]
    Read(#[from] ReadXlsxError),
    /// Document writing failure.
    #[error(transparent)]
    Write(#[from] WriteXlsxError),
    /// Output directory could not be prepared.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Frame operation failure.
    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
