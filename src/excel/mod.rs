//! Excel I/O: `.xlsx` containers to the in-memory grid and back.
//!
//! The read side (calamine) and write side (rust_xlsxwriter) are one-way
//! each, so a reconciliation run always flows import → mutate → export.

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;
