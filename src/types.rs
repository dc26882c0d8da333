use crate::error::{PatchError, PatchResult};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

//==============================================================================
// Cell values
//==============================================================================

/// A single worksheet cell: an optional scalar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The user-visible string form of the cell.
    ///
    /// Integral numbers render without a decimal point, so a cell holding
    /// `1001.0` displays as `"1001"` and compares equal to the code string
    /// `"1001"` a user typed.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
        }
    }

    /// Integer view of the cell, used by the row locator's numeric fallback.
    ///
    /// Numbers truncate toward zero, text parses as a trimmed base-10
    /// integer, booleans map to 0/1. Empty cells have no integer view.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) => {
                if n.is_finite() && n.abs() < i64::MAX as f64 {
                    Some(n.trunc() as i64)
                } else {
                    None
                }
            }
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Bool(b) => Some(i64::from(*b)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

//==============================================================================
// Worksheets and workbooks
//==============================================================================

const EMPTY_CELL: CellValue = CellValue::Empty;

/// A named 2-D grid of cells with 1-based row/column addressing.
///
/// The grid is jagged: rows may have differing populated extents. Reads
/// outside the populated area yield [`CellValue::Empty`]; writes grow the
/// grid as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of populated rows (trailing all-empty rows included if written).
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Cells of a 1-based row; an empty slice beyond the populated extent.
    pub fn row(&self, row: u32) -> &[CellValue] {
        if row == 0 {
            return &[];
        }
        self.rows
            .get(row as usize - 1)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The cell at a 1-based (row, column) position.
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        if row == 0 || col == 0 {
            return &EMPTY_CELL;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Overwrite the cell at a 1-based (row, column) position, growing the
    /// grid with empty cells as needed. Positions with a zero coordinate are
    /// ignored.
    pub fn set_cell(&mut self, row: u32, col: u32, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        let row = row as usize - 1;
        let col = col as usize - 1;
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, CellValue::default);
        }
        cells[col] = value;
    }
}

/// An ordered collection of worksheets. Declaration order is the tie-break
/// order for sheet location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    sheets: Vec<Sheet>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }
}

//==============================================================================
// Records
//==============================================================================

/// Label of the field that carries a record's row-lookup code.
pub const CODE_LABEL: &str = "Código";

/// One user-submitted update: an ordered mapping from field label to string
/// value. The code field ([`CODE_LABEL`]) must be present and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// A record carrying only its code.
    pub fn new(code: impl Into<String>) -> PatchResult<Self> {
        Self::from_pairs(vec![(CODE_LABEL.to_string(), code.into())])
    }

    /// Build a record from label/value pairs, preserving order.
    ///
    /// A later duplicate label overwrites the earlier value in place.
    /// Fails with [`PatchError::EmptyCode`] unless the code field is present
    /// with a non-empty trimmed value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> PatchResult<Self> {
        let mut fields: Vec<(String, String)> = Vec::with_capacity(pairs.len());
        for (label, value) in pairs {
            match fields.iter_mut().find(|(l, _)| *l == label) {
                Some(entry) => entry.1 = value,
                None => fields.push((label, value)),
            }
        }
        let record = Record { fields };
        if record.code().trim().is_empty() {
            return Err(PatchError::EmptyCode);
        }
        Ok(record)
    }

    /// Set a field value, appending the label if new.
    pub fn set(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((label, value)),
        }
    }

    /// Builder-style [`Record::set`].
    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(label, value);
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// The row-lookup code value.
    pub fn code(&self) -> &str {
        self.get(CODE_LABEL).unwrap_or("")
    }

    /// All fields in insertion order, the code field included.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Scalar JSON forms accepted for a record field value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Missing,
}

impl RawFieldValue {
    fn into_string(self) -> String {
        match self {
            RawFieldValue::Text(s) => s,
            RawFieldValue::Number(n) => CellValue::Number(n).display(),
            RawFieldValue::Bool(b) => CellValue::Bool(b).display(),
            RawFieldValue::Missing => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field labels to values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Record, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs: Vec<(String, String)> = Vec::new();
                while let Some((label, value)) = map.next_entry::<String, RawFieldValue>()? {
                    pairs.push((label, value.into_string()));
                }
                Record::from_pairs(pairs).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, value) in &self.fields {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

//==============================================================================
// Reconciliation outcomes
//==============================================================================

/// Per-record result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The record's code matched this 1-based row and its fields were applied.
    Applied { row: u32 },
    /// The record's code matched no cell in the worksheet.
    NotFound { code: String },
}

/// Ordered outcomes of one reconciliation run, one per input record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub outcomes: Vec<Outcome>,
}

impl ReconcileReport {
    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Applied { .. }))
            .count()
    }

    /// Codes that matched no row, in input order.
    pub fn missing_codes(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                Outcome::NotFound { code } => Some(code.as_str()),
                Outcome::Applied { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_display_without_decimal_point() {
        assert_eq!(CellValue::Number(1001.0).display(), "1001");
        assert_eq!(CellValue::Number(-42.0).display(), "-42");
        assert_eq!(CellValue::Number(3.5).display(), "3.5");
    }

    #[test]
    fn cell_integer_views() {
        assert_eq!(CellValue::Number(123.0).as_integer(), Some(123));
        assert_eq!(CellValue::Number(123.9).as_integer(), Some(123));
        assert_eq!(CellValue::Text(" 0123 ".to_string()).as_integer(), Some(123));
        assert_eq!(CellValue::Text("12.5".to_string()).as_integer(), None);
        assert_eq!(CellValue::Text("ABC".to_string()).as_integer(), None);
        assert_eq!(CellValue::Bool(true).as_integer(), Some(1));
        assert_eq!(CellValue::Empty.as_integer(), None);
    }

    #[test]
    fn sheet_reads_outside_extent_are_empty() {
        let sheet = Sheet::from_rows("S", vec![vec![CellValue::from("a")]]);
        assert_eq!(sheet.cell(1, 1), &CellValue::from("a"));
        assert!(sheet.cell(1, 2).is_empty());
        assert!(sheet.cell(99, 1).is_empty());
        assert!(sheet.row(5).is_empty());
    }

    #[test]
    fn sheet_writes_grow_the_grid() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(4, 3, CellValue::from("x"));
        assert_eq!(sheet.row_count(), 4);
        assert!(sheet.cell(4, 2).is_empty());
        assert_eq!(sheet.cell(4, 3).display(), "x");
        assert!(sheet.row(1).is_empty());
    }

    #[test]
    fn record_requires_a_code() {
        assert!(Record::new("").is_err());
        assert!(Record::new("   ").is_err());
        assert!(Record::from_pairs(vec![("Estado".to_string(), "OK".to_string())]).is_err());
        let record = Record::new("1001").unwrap();
        assert_eq!(record.code(), "1001");
    }

    #[test]
    fn record_preserves_field_order() {
        let record = Record::new("1001")
            .unwrap()
            .with_field("Estado", "GESTIONADO")
            .with_field("Acta firmada", "SI");
        let labels: Vec<&str> = record.fields().map(|(l, _)| l).collect();
        assert_eq!(labels, vec![CODE_LABEL, "Estado", "Acta firmada"]);
    }

    #[test]
    fn record_deserializes_from_json_object() {
        let record: Record =
            serde_json::from_str(r#"{"Código": "1001", "Estado": "GESTIONADO", "No. Acta": 25}"#)
                .unwrap();
        assert_eq!(record.code(), "1001");
        assert_eq!(record.get("Estado"), Some("GESTIONADO"));
        assert_eq!(record.get("No. Acta"), Some("25"));
    }

    #[test]
    fn record_deserialization_accepts_numeric_code() {
        let record: Record = serde_json::from_str(r#"{"Código": 1001}"#).unwrap();
        assert_eq!(record.code(), "1001");
    }

    #[test]
    fn record_deserialization_rejects_missing_code() {
        let result: Result<Record, _> = serde_json::from_str(r#"{"Estado": "GESTIONADO"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn record_serializes_back_to_object() {
        let record = Record::new("7").unwrap().with_field("Estado", "EN GESTION");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Código":"7","Estado":"EN GESTION"}"#);
    }

    #[test]
    fn report_accessors() {
        let report = ReconcileReport {
            outcomes: vec![
                Outcome::Applied { row: 3 },
                Outcome::NotFound {
                    code: "9999".to_string(),
                },
                Outcome::Applied { row: 5 },
            ],
        };
        assert_eq!(report.applied_count(), 2);
        assert_eq!(report.missing_codes(), vec!["9999"]);
    }

    #[test]
    fn outcome_json_shape() {
        let json = serde_json::to_string(&Outcome::Applied { row: 3 }).unwrap();
        assert_eq!(json, r#"{"status":"applied","row":3}"#);
        let json = serde_json::to_string(&Outcome::NotFound {
            code: "9999".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"not_found","code":"9999"}"#);
    }
}
