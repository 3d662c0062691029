//! Workbook loader: first (or named) worksheet into a string DataFrame.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};

use crate::conf::TUP_SPREADSHEET_EXTENSIONS;
use crate::spec::ReadXlsxError;
use crate::util::derive_unique_column_names;

/// `true` when the file extension is one the loader understands.
pub fn is_supported_spreadsheet(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| TUP_SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
}

/// Read one worksheet as a DataFrame.
///
/// The first row is the header; every column is a nullable string column
/// and empty cells are nulls. `sheet_name = None` reads the first sheet.
pub fn read_sheet_dataframe(
    path: &Path,
    sheet_name: Option<&str>,
) -> Result<DataFrame, ReadXlsxError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| ReadXlsxError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let range = match sheet_name {
        Some(name) => {
            workbook
                .worksheet_range(name)
                .map_err(|source| ReadXlsxError::Sheet {
                    path: path.to_path_buf(),
                    sheet_name: name.to_string(),
                    source,
                })?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ReadXlsxError::NoWorksheet(path.to_path_buf()))?
            .map_err(|source| ReadXlsxError::Sheet {
                path: path.to_path_buf(),
                sheet_name: "#0".to_string(),
                source,
            })?,
    };

    let df = derive_dataframe_from_range(&range)?;
    tracing::debug!(
        "Loaded {} (rows={}, cols={})",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

fn derive_dataframe_from_range(range: &Range<Data>) -> Result<DataFrame, ReadXlsxError> {
    let mut iter_rows = range.rows();
    let Some(row_header) = iter_rows.next() else {
        return Ok(DataFrame::empty());
    };

    let l_header: Vec<Option<String>> = row_header.iter().map(derive_cell_text).collect();
    let l_colnames = derive_unique_column_names(&l_header);

    let mut l_values_by_col: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(range.height().saturating_sub(1)); l_colnames.len()];
    for row in iter_rows {
        for (n_idx_col, l_values) in l_values_by_col.iter_mut().enumerate() {
            l_values.push(row.get(n_idx_col).and_then(derive_cell_text));
        }
    }

    let l_columns: Vec<Column> = l_colnames
        .iter()
        .zip(l_values_by_col)
        .map(|(c_name, l_values)| {
            Column::from(Series::new(PlSmallStr::from(c_name.as_str()), l_values))
        })
        .collect();

    Ok(DataFrame::new(l_columns)?)
}

fn derive_cell_text(value: &Data) -> Option<String> {
    match value {
        Data::Empty => None,
        Data::String(v) if v.is_empty() => None,
        Data::String(v) => Some(v.clone()),
        other => Some(other.to_string()),
    }
}
