//! Excel exporter implementation - in-memory [`Book`] → `.xlsx`

use crate::error::{PatchError, PatchResult};
use crate::types::{Book, CellValue, Sheet};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Excel exporter serializing the grid model back to an `.xlsx` container.
///
/// Cells are written at their absolute 1-based coordinates; empty cells are
/// not written at all. No styling is carried; the grid model holds values
/// only.
pub struct ExcelExporter<'a> {
    book: &'a Book,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter over a workbook snapshot.
    pub fn new(book: &'a Book) -> Self {
        Self { book }
    }

    /// Export the workbook to an `.xlsx` file.
    pub fn export(&self, output_path: &Path) -> PatchResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| PatchError::Export(format!("Failed to save Excel file: {e}")))?;
        Ok(())
    }

    /// Export the workbook as `.xlsx` bytes, for callers that stream the
    /// result instead of touching disk.
    pub fn to_bytes(&self) -> PatchResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save_to_buffer()
            .map_err(|e| PatchError::Export(format!("Failed to serialize Excel bytes: {e}")))
    }

    fn build_workbook(&self) -> PatchResult<Workbook> {
        let mut workbook = Workbook::new();
        for sheet in self.book.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(sheet.name())
                .map_err(|e| PatchError::Export(format!("Failed to set worksheet name: {e}")))?;
            Self::write_sheet(worksheet, sheet)?;
        }
        Ok(workbook)
    }

    fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> PatchResult<()> {
        for (row_idx, row) in sheet.rows().iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let row = row_idx as u32;
                let col = col_idx as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Number(n) => {
                        worksheet.write_number(row, col, *n).map_err(|e| {
                            PatchError::Export(format!("Failed to write number: {e}"))
                        })?;
                    }
                    CellValue::Text(s) => {
                        worksheet
                            .write_string(row, col, s)
                            .map_err(|e| PatchError::Export(format!("Failed to write text: {e}")))?;
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row, col, *b).map_err(|e| {
                            PatchError::Export(format!("Failed to write boolean: {e}"))
                        })?;
                    }
                }
            }
        }
        Ok(())
    }
}
