use thiserror::Error;

pub type PatchResult<T> = Result<T, PatchError>;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Records parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook import error: {0}")]
    Import(String),

    #[error("Workbook export error: {0}")]
    Export(String),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Record has an empty code field")]
    EmptyCode,
}
