//! Stateless helper utilities used by the reader and writer kernels.

use std::collections::BTreeSet;

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};

const N_MM_PER_INCH: f64 = 25.4;
const N_POINTS_PER_INCH: f64 = 72.0;
const N_PIXELS_PER_INCH: f64 = 96.0;
// Default font (Calibri 11) metrics: one width unit is 7 px plus 5 px padding.
const N_PIXELS_PER_WIDTH_UNIT: f64 = 7.0;
const N_PIXELS_WIDTH_PADDING: f64 = 5.0;

////////////////////////////////////////////////////////////////////////////////
// #region UnitConversion

/// Millimetres to inches (page margins).
pub fn convert_mm_to_inches(mm: f64) -> f64 {
    mm / N_MM_PER_INCH
}

/// Millimetres to points (row heights).
pub fn convert_mm_to_points(mm: f64) -> f64 {
    mm / N_MM_PER_INCH * N_POINTS_PER_INCH
}

/// Millimetres to Excel column width units.
pub fn convert_mm_to_column_width(mm: f64) -> f64 {
    let n_pixels = mm / N_MM_PER_INCH * N_PIXELS_PER_INCH;
    f64::max(0.0, (n_pixels - N_PIXELS_WIDTH_PADDING) / N_PIXELS_PER_WIDTH_UNIT)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Create suffixed sheet name (`base_1`, `base_2`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

/// Row indices before which a manual page break is placed.
///
/// A grid of `n_rows` split every `n_rows_per_page` rows gets breaks at
/// `n_rows_per_page, 2 * n_rows_per_page, ...` (never at row 0 or at the end).
pub fn derive_page_break_rows(n_rows: usize, n_rows_per_page: usize) -> Vec<usize> {
    if n_rows_per_page == 0 {
        return vec![];
    }
    (1..)
        .map(|n_page| n_page * n_rows_per_page)
        .take_while(|n_row| *n_row < n_rows)
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Turn raw header cells into unique, non-empty column names.
///
/// Blank headers become `Unnamed: {idx}`; repeated names get `.1`, `.2`, ...
/// suffixes in order of appearance.
pub fn derive_unique_column_names(header: &[Option<String>]) -> Vec<String> {
    let mut set_names_seen: BTreeSet<String> = BTreeSet::new();
    let mut l_names = Vec::with_capacity(header.len());

    for (n_idx, c_raw) in header.iter().enumerate() {
        let c_base = match c_raw.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => format!("Unnamed: {n_idx}"),
        };

        let mut c_name = c_base.clone();
        let mut n_suffix = 1;
        while set_names_seen.contains(&c_name) {
            c_name = format!("{c_base}.{n_suffix}");
            n_suffix += 1;
        }
        set_names_seen.insert(c_name.clone());
        l_names.push(c_name);
    }

    l_names
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("front/labels", "_"), "front_labels");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);
    }

    #[test]
    fn test_create_sheet_identifier_respects_length_cap() {
        let c_name = create_sheet_identifier(&"a".repeat(31), 12);
        assert_eq!(c_name.chars().count(), 31);
        assert!(c_name.ends_with("_12"));
    }

    #[test]
    fn test_derive_page_break_rows() {
        assert_eq!(derive_page_break_rows(14, 14), Vec::<usize>::new());
        assert_eq!(derive_page_break_rows(42, 14), vec![14, 28]);
        assert_eq!(derive_page_break_rows(7, 0), Vec::<usize>::new());
    }

    #[test]
    fn test_derive_unique_column_names() {
        let header = vec![
            Some("Хостнейм".to_string()),
            None,
            Some("Хостнейм".to_string()),
            Some(" ".to_string()),
            Some("Хостнейм".to_string()),
        ];
        assert_eq!(
            derive_unique_column_names(&header),
            vec![
                "Хостнейм",
                "Unnamed: 1",
                "Хостнейм.1",
                "Unnamed: 3",
                "Хостнейм.2"
            ]
        );
    }

    #[test]
    fn test_unit_conversion() {
        assert!((convert_mm_to_inches(25.4) - 1.0).abs() < 1e-9);
        assert!((convert_mm_to_points(25.4) - 72.0).abs() < 1e-9);
        // 25.4 mm = 96 px -> (96 - 5) / 7 = 13 width units.
        assert!((convert_mm_to_column_width(25.4) - 13.0).abs() < 1e-9);
        assert_eq!(convert_mm_to_column_width(0.0), 0.0);
    }
}
