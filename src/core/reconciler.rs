//! Batch application of records to a workbook.

use crate::core::header::{build_header_index, resolve_column, HeaderIndex};
use crate::core::locator::{locate_row, locate_sheet};
use crate::error::{PatchError, PatchResult};
use crate::types::{Book, CellValue, Outcome, ReconcileReport, Record, Sheet, CODE_LABEL};

/// Apply a batch of records to a workbook.
///
/// Pure transform: consumes the workbook snapshot and returns the mutated
/// snapshot alongside one [`Outcome`] per record, in input order. The target
/// worksheet is located once and its header index built once; each record
/// then looks up its row by code and writes its non-empty fields into the
/// resolved columns.
///
/// Best-effort batch semantics: a record whose code matches no row yields
/// `NotFound` and touches nothing; a field whose label resolves to no header
/// is dropped without a report entry; no rollback ties records together.
/// Duplicate codes across records overwrite each other cell by cell, last
/// write wins.
///
/// Fails only when the workbook has no worksheets at all.
pub fn reconcile(
    mut book: Book,
    sheet_name: &str,
    records: &[Record],
) -> PatchResult<(Book, ReconcileReport)> {
    let sheet_idx = locate_sheet(&book, sheet_name).ok_or(PatchError::EmptyWorkbook)?;
    let sheet = book.sheet_mut(sheet_idx).ok_or(PatchError::EmptyWorkbook)?;
    let headers = build_header_index(sheet);

    let mut report = ReconcileReport::default();
    for record in records {
        match locate_row(sheet, record.code()) {
            Some(row) => {
                apply_fields(sheet, row, record, &headers);
                report.outcomes.push(Outcome::Applied { row });
            }
            None => report.outcomes.push(Outcome::NotFound {
                code: record.code().to_string(),
            }),
        }
    }

    Ok((book, report))
}

/// Write one record's fields into its matched row.
///
/// The code field never writes itself back; empty values mean "leave the
/// cell alone". Values land as text; the record producer owns formatting.
fn apply_fields(sheet: &mut Sheet, row: u32, record: &Record, headers: &HeaderIndex) {
    for (label, value) in record.fields() {
        if label == CODE_LABEL || value.is_empty() {
            continue;
        }
        if let Some(col) = resolve_column(label, headers) {
            sheet.set_cell(row, col, CellValue::Text(value.to_string()));
        }
    }
}
