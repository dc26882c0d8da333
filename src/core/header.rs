//! Header discovery and field-to-column resolution.

use crate::normalize::normalize;
use crate::types::Sheet;

/// Rows 1..=HEADER_SCAN_ROWS are searched for the header row.
pub const HEADER_SCAN_ROWS: u32 = 10;

/// Mapping from normalized header text to its 1-based column.
///
/// Entries keep left-to-right column order so the substring fallback in
/// [`resolve_column`] resolves ties toward the leftmost header. A duplicate
/// normalized header updates the stored column in place: the rightmost
/// occurrence wins while the entry keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderIndex {
    entries: Vec<(String, u32)>,
}

impl HeaderIndex {
    /// Exact lookup. The key must already be normalized.
    pub fn column(&self, key: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(header, _)| header == key)
            .map(|(_, col)| *col)
    }

    /// Entries in insertion (left-to-right column) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(header, col)| (header.as_str(), *col))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, column: u32) {
        match self.entries.iter_mut().find(|(header, _)| *header == key) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((key, column)),
        }
    }
}

/// Build the header index for a worksheet.
///
/// The header row is the first row within the scan window containing at
/// least one cell with a non-empty trimmed string form; row 1 is the
/// fallback even if empty. Every cell of the chosen row is visited left to
/// right; cells whose normalized text is empty are skipped.
pub fn build_header_index(sheet: &Sheet) -> HeaderIndex {
    let header_row = find_header_row(sheet);
    let mut index = HeaderIndex::default();
    for (col, cell) in sheet.row(header_row).iter().enumerate() {
        let key = normalize(&cell.display());
        if key.is_empty() {
            continue;
        }
        index.insert(key, col as u32 + 1);
    }
    index
}

fn find_header_row(sheet: &Sheet) -> u32 {
    for row in 1..=HEADER_SCAN_ROWS {
        if sheet
            .row(row)
            .iter()
            .any(|cell| !cell.display().trim().is_empty())
        {
            return row;
        }
    }
    1
}

//==============================================================================
// Field resolution
//==============================================================================

/// A column-matching strategy over a normalized field label.
type ColumnMatcher = fn(&str, &HeaderIndex) -> Option<u32>;

/// Evaluated in order; the first strategy yielding a column wins.
const COLUMN_MATCHERS: [ColumnMatcher; 2] = [exact_header, substring_header];

/// Resolve a record's field label to a 1-based worksheet column.
///
/// Exact normalized match first, then the first header containing the label
/// as a substring, in index order, so the leftmost column wins ties.
pub fn resolve_column(field_label: &str, headers: &HeaderIndex) -> Option<u32> {
    let key = normalize(field_label);
    COLUMN_MATCHERS
        .iter()
        .find_map(|matcher| matcher(&key, headers))
}

fn exact_header(key: &str, headers: &HeaderIndex) -> Option<u32> {
    headers.column(key)
}

fn substring_header(key: &str, headers: &HeaderIndex) -> Option<u32> {
    headers
        .iter()
        .find(|(header, _)| header.contains(key))
        .map(|(_, col)| col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn header_sheet(headers: &[&str]) -> Sheet {
        Sheet::from_rows(
            "S",
            vec![headers.iter().map(|h| CellValue::from(*h)).collect()],
        )
    }

    #[test]
    fn indexes_first_row_headers() {
        let index = build_header_index(&header_sheet(&["Codigo", "Estado", "Ejecuta"]));
        assert_eq!(index.column("codigo"), Some(1));
        assert_eq!(index.column("estado"), Some(2));
        assert_eq!(index.column("ejecuta"), Some(3));
    }

    #[test]
    fn skips_blank_leading_rows() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(4, 1, CellValue::from("Codigo"));
        sheet.set_cell(4, 2, CellValue::from("Estado"));
        let index = build_header_index(&sheet);
        assert_eq!(index.column("codigo"), Some(1));
        assert_eq!(index.column("estado"), Some(2));
    }

    #[test]
    fn whitespace_only_rows_are_not_headers() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![CellValue::from("   ")],
                vec![CellValue::from("Codigo")],
            ],
        );
        assert_eq!(build_header_index(&sheet).column("codigo"), Some(1));
    }

    #[test]
    fn headers_below_scan_window_fall_back_to_row_one() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(12, 1, CellValue::from("Codigo"));
        assert!(build_header_index(&sheet).is_empty());
    }

    #[test]
    fn gaps_in_the_header_row_are_skipped() {
        let sheet = Sheet::from_rows(
            "S",
            vec![vec![
                CellValue::from("Codigo"),
                CellValue::Empty,
                CellValue::from("Estado"),
            ]],
        );
        let index = build_header_index(&sheet);
        assert_eq!(index.len(), 2);
        assert_eq!(index.column("estado"), Some(3));
    }

    #[test]
    fn duplicate_headers_keep_position_take_last_column() {
        let index = build_header_index(&header_sheet(&["Estado", "Codigo", "Estado"]));
        assert_eq!(index.column("estado"), Some(3));
        // Iteration still sees "estado" first.
        let first = index.iter().next().unwrap();
        assert_eq!(first, ("estado", 3));
    }

    #[test]
    fn numeric_headers_index_by_display_form() {
        let sheet = Sheet::from_rows("S", vec![vec![CellValue::from(2024i64)]]);
        assert_eq!(build_header_index(&sheet).column("2024"), Some(1));
    }

    #[test]
    fn resolves_exact_normalized_label() {
        let index = build_header_index(&header_sheet(&["fecha de ejecucion", "estado"]));
        assert_eq!(resolve_column("Fecha de ejecución", &index), Some(1));
    }

    #[test]
    fn resolves_label_contained_in_header() {
        let index = build_header_index(&header_sheet(&["codigo", "efectividad en terreno"]));
        assert_eq!(resolve_column("terreno", &index), Some(2));
    }

    #[test]
    fn substring_ties_resolve_to_leftmost_header() {
        let index = build_header_index(&header_sheet(&[
            "efectividad en terreno",
            "efectividad para rcdf",
        ]));
        assert_eq!(resolve_column("Efectividad", &index), Some(1));
    }

    #[test]
    fn exact_match_beats_substring_match() {
        let index = build_header_index(&header_sheet(&["estado general", "estado"]));
        assert_eq!(resolve_column("Estado", &index), Some(2));
    }

    #[test]
    fn unknown_label_is_unresolved() {
        let index = build_header_index(&header_sheet(&["codigo", "estado"]));
        assert_eq!(resolve_column("Observaciones", &index), None);
    }
}
