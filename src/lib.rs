//! Bookpatch - batch updates for existing Excel workbooks
//!
//! Takes a workbook plus a batch of inspection records and writes each
//! record's field values into the row matching its code. Rows are found by
//! scanning every cell for the code (exact string first, digit-stripped
//! integer fallback); columns are found by fuzzy header matching (accents
//! and case folded, substring fallback).
//!
//! # Example
//!
//! ```no_run
//! use bookpatch::core::reconcile;
//! use bookpatch::excel::{ExcelExporter, ExcelImporter};
//! use bookpatch::types::Record;
//!
//! let book = ExcelImporter::new("avisos.xlsx").import()?;
//! let records = vec![Record::new("1001")?.with_field("Estado", "GESTIONADO")];
//!
//! let (book, report) = reconcile(book, "PROGRAMACION", &records)?;
//! println!("applied: {}", report.applied_count());
//!
//! ExcelExporter::new(&book).export("resultado_actualizado.xlsx".as_ref())?;
//! # Ok::<(), bookpatch::error::PatchError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod normalize;
pub mod types;

// Re-export commonly used types
pub use error::{PatchError, PatchResult};
pub use types::{Book, CellValue, Outcome, ReconcileReport, Record, Sheet};
