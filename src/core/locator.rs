//! Worksheet and row lookup.

use crate::normalize::normalize;
use crate::types::{Book, Sheet};

//==============================================================================
// Sheet location
//==============================================================================

/// A sheet-matching strategy: the index of a matching sheet, if any.
type SheetMatcher = fn(&Book, &str) -> Option<usize>;

/// Evaluated in order; the first strategy yielding a sheet wins.
const SHEET_MATCHERS: [SheetMatcher; 3] = [exact_name, name_contains, first_sheet];

/// Find the worksheet a desired name refers to.
///
/// Resolution order: exact normalized-name match, then normalized substring
/// containment, then the first sheet in declaration order. Ties within a
/// strategy also break by declaration order. Returns `None` only for a
/// workbook with no sheets.
pub fn locate_sheet(book: &Book, desired_name: &str) -> Option<usize> {
    SHEET_MATCHERS
        .iter()
        .find_map(|matcher| matcher(book, desired_name))
}

fn exact_name(book: &Book, desired_name: &str) -> Option<usize> {
    let target = normalize(desired_name);
    book.sheets()
        .iter()
        .position(|sheet| normalize(sheet.name()) == target)
}

fn name_contains(book: &Book, desired_name: &str) -> Option<usize> {
    let target = normalize(desired_name);
    book.sheets()
        .iter()
        .position(|sheet| normalize(sheet.name()).contains(&target))
}

fn first_sheet(book: &Book, _desired_name: &str) -> Option<usize> {
    if book.is_empty() {
        None
    } else {
        Some(0)
    }
}

//==============================================================================
// Row location
//==============================================================================

/// Find the 1-based row whose any cell matches a record's code.
///
/// Every cell of the sheet is scanned in row-major order. A cell matches when
/// its trimmed string form equals the trimmed code exactly, or, as a fallback
/// for codes stored as numbers (leading zeros and formatting lost), when its
/// integer view equals the code with all non-digit characters stripped.
/// First matching row wins. Codes may appear in any column, so no column
/// index is pre-built and the scan covers the full grid.
pub fn locate_row(sheet: &Sheet, code: &str) -> Option<u32> {
    let code_str = code.trim();
    let code_int = parse_code_digits(code_str);

    for (row_idx, row) in sheet.rows().iter().enumerate() {
        for cell in row {
            if cell.is_empty() {
                continue;
            }
            if cell.display().trim() == code_str {
                return Some(row_idx as u32 + 1);
            }
            if let (Some(target), Some(value)) = (code_int, cell.as_integer()) {
                if value == target {
                    return Some(row_idx as u32 + 1);
                }
            }
        }
    }
    None
}

/// The code with all non-digit characters stripped, as an integer.
/// Absent when no digits remain or the digit run overflows.
fn parse_code_digits(code: &str) -> Option<i64> {
    let digits: String = code.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn book_with(names: &[&str]) -> Book {
        let mut book = Book::new();
        for name in names {
            book.add_sheet(Sheet::new(*name));
        }
        book
    }

    #[test]
    fn exact_match_ignores_case_and_accents() {
        let book = book_with(&["Hoja1", "PROGRAMACION", "Otros"]);
        assert_eq!(locate_sheet(&book, "programacion"), Some(1));
        assert_eq!(locate_sheet(&book, "PROGRAMACIÓN"), Some(1));
    }

    #[test]
    fn substring_match_when_no_exact() {
        let book = book_with(&["X", "PROGRAMACION_2024"]);
        assert_eq!(locate_sheet(&book, "progra"), Some(1));
    }

    #[test]
    fn exact_match_beats_substring() {
        let book = book_with(&["PROGRAMACION_OLD", "PROGRAMACION"]);
        assert_eq!(locate_sheet(&book, "programacion"), Some(1));
    }

    #[test]
    fn falls_back_to_first_sheet() {
        let book = book_with(&["A", "B"]);
        assert_eq!(locate_sheet(&book, "no such sheet"), Some(0));
    }

    #[test]
    fn empty_workbook_has_no_sheet() {
        assert_eq!(locate_sheet(&Book::new(), "anything"), None);
    }

    #[test]
    fn string_code_matches_exactly() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![CellValue::from("Codigo"), CellValue::from("Estado")],
                vec![CellValue::from("00123"), CellValue::from("PENDIENTE")],
            ],
        );
        assert_eq!(locate_row(&sheet, "00123"), Some(2));
    }

    #[test]
    fn numeric_cell_matches_code_via_digit_fallback() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![CellValue::from("Codigo")],
                vec![CellValue::from(123i64)],
            ],
        );
        // "0123" != "123" as strings, but both strip to the integer 123.
        assert_eq!(locate_row(&sheet, "0123"), Some(2));
    }

    #[test]
    fn surrounding_whitespace_is_ignored_on_both_sides() {
        let sheet = Sheet::from_rows("S", vec![vec![CellValue::from("  A-77  ")]]);
        assert_eq!(locate_row(&sheet, " A-77 "), Some(1));
    }

    #[test]
    fn code_may_appear_in_any_column() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![CellValue::from("x"), CellValue::from("y")],
                vec![
                    CellValue::from("noise"),
                    CellValue::Empty,
                    CellValue::from("A-9"),
                ],
            ],
        );
        assert_eq!(locate_row(&sheet, "A-9"), Some(2));
    }

    #[test]
    fn first_matching_row_wins() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![CellValue::from("1001")],
                vec![CellValue::from("1001")],
            ],
        );
        assert_eq!(locate_row(&sheet, "1001"), Some(1));
    }

    #[test]
    fn missing_code_is_not_found() {
        let sheet = Sheet::from_rows("S", vec![vec![CellValue::from("1001")]]);
        assert_eq!(locate_row(&sheet, "ABC"), None);
    }

    #[test]
    fn codes_without_digits_never_match_numerically() {
        let sheet = Sheet::from_rows("S", vec![vec![CellValue::from(0i64)]]);
        // "ABC" strips to no digits at all; the numeric fallback must stay off
        // rather than treating it as 0.
        assert_eq!(locate_row(&sheet, "ABC"), None);
    }
}
