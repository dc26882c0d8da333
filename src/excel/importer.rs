//! Excel importer implementation - `.xlsx` → in-memory [`Book`]

use crate::error::{PatchError, PatchResult};
use crate::types::{Book, CellValue, Sheet};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Excel importer for loading `.xlsx` workbooks into the grid model.
///
/// Every worksheet is materialized with its absolute 1-based coordinates:
/// calamine reports a trimmed range with a start offset, and the offset is
/// re-applied so blank leading rows and columns survive the import. Header
/// discovery depends on seeing the real row numbers.
pub struct ExcelImporter {
    path: std::path::PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer for a file on disk.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the file into a [`Book`].
    pub fn import(&self) -> PatchResult<Book> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| PatchError::Import(format!("Failed to open Excel file: {e}")))?;
        Self::read_book(&mut workbook)
    }

    /// Import a workbook supplied as raw `.xlsx` bytes.
    pub fn import_bytes(bytes: &[u8]) -> PatchResult<Book> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| PatchError::Import(format!("Failed to read Excel bytes: {e}")))?;
        Self::read_book(&mut workbook)
    }

    fn read_book<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> PatchResult<Book> {
        let mut book = Book::new();

        let sheet_names = workbook.sheet_names().to_vec();
        for sheet_name in sheet_names {
            if let Ok(range) = workbook.worksheet_range(&sheet_name) {
                book.add_sheet(Self::sheet_from_range(&sheet_name, &range));
            }
        }

        Ok(book)
    }

    /// Materialize one worksheet, restoring absolute cell positions.
    fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
        let mut sheet = Sheet::new(name);
        let Some((row_offset, col_offset)) = range.start() else {
            return sheet; // sheet exists but holds no cells
        };

        let (height, width) = range.get_size();
        for row in 0..height {
            for col in 0..width {
                if let Some(data) = range.get((row, col)) {
                    let value = Self::convert_cell(data);
                    if !value.is_empty() {
                        sheet.set_cell(
                            row_offset + row as u32 + 1,
                            col_offset + col as u32 + 1,
                            value,
                        );
                    }
                }
            }
        }
        sheet
    }

    /// Convert a calamine cell to the grid model.
    fn convert_cell(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            // Date cells participate in matching through their serial number.
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}
