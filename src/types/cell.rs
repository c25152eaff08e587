use serde::{Deserialize, Serialize};

/// Cell with position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellData {
    pub r: u32, // row (0-indexed)
    pub c: u32, // col (0-indexed)
    pub cell: Cell,
}

/// A single cell's value plus what the writer needs to round-trip it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// The cell value.
    pub value: CellValue,
    /// Style index into the template's styles.xml (passed through verbatim).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_idx: Option<u32>,
    /// Formula text, preserved so clones keep their formulas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Cell {
    /// Cell holding a plain text value with no style or formula.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Cell {
            value: CellValue::Text(value.into()),
            style_idx: None,
            formula: None,
        }
    }

    /// The textual content of this cell, if it is a text cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A cell value in the model.
///
/// Numbers carry no int/float distinction; `42.0` prints as `42` in the
/// worksheet XML, which is what the numeric-coercion rules rely on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "t", content = "v")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Error(String),
    /// A cell with no value but a style or formula worth round-tripping.
    Empty,
}

impl CellValue {
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }
}
