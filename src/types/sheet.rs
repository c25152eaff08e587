use serde::{Deserialize, Serialize};

use super::{CellData, CellValue, Picture};
use crate::units::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT_PT};

/// A rectangular merged-cell region. All indices are 0-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    /// A degenerate 1x1 range covering a single unmerged cell.
    #[must_use]
    pub fn single(row: u32, col: u32) -> Self {
        MergeRange {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Whether the given cell falls inside this range.
    #[must_use]
    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.start_row <= row && row <= self.end_row && self.start_col <= col && col <= self.end_col
    }
}

/// Explicit width for one column, in Excel grid units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColWidth {
    /// Column index (0-based).
    pub col: u32,
    /// Width in grid units.
    pub width: f64,
}

/// Explicit height for one row, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RowHeight {
    /// Row index (0-based).
    pub row: u32,
    /// Height in points.
    pub height: f64,
}

/// A single worksheet.
///
/// `Clone` is load-bearing: the assembler duplicates the scaffold sheet once
/// per entry. Sizing stays in the template's native units (grid units for
/// columns, points for rows); pixel conversion happens only in the layout
/// path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    /// Sparse representation: Vec of (row, col, cell)
    pub cells: Vec<CellData>,
    pub merges: Vec<MergeRange>,
    pub col_widths: Vec<ColWidth>,
    pub row_heights: Vec<RowHeight>,
    /// Default column width in grid units.
    pub default_col_width: f64,
    /// Default row height in points.
    pub default_row_height: f64,
    pub max_row: u32,
    pub max_col: u32,
    /// Pictures placed on this sheet (never present on the scaffold).
    #[serde(skip)]
    pub pictures: Vec<Picture>,
}

impl Sheet {
    /// An empty sheet with template defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            cells: Vec::new(),
            merges: Vec::new(),
            col_widths: Vec::new(),
            row_heights: Vec::new(),
            default_col_width: DEFAULT_COL_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT_PT,
            max_row: 0,
            max_col: 0,
            pictures: Vec::new(),
        }
    }

    /// Width of a column in grid units, falling back to the sheet default.
    #[must_use]
    pub fn col_width_units(&self, col: u32) -> f64 {
        self.col_widths
            .iter()
            .find(|cw| cw.col == col)
            .map_or(self.default_col_width, |cw| cw.width)
    }

    /// Height of a row in points, falling back to the sheet default.
    #[must_use]
    pub fn row_height_points(&self, row: u32) -> f64 {
        self.row_heights
            .iter()
            .find(|rh| rh.row == row)
            .map_or(self.default_row_height, |rh| rh.height)
    }

    /// Index into `cells` of the cell at (row, col), if present.
    #[must_use]
    pub fn cell_index_at(&self, row: u32, col: u32) -> Option<usize> {
        self.cells.iter().position(|c| c.r == row && c.c == col)
    }

    /// The value of the cell at (row, col), if present.
    #[must_use]
    pub fn cell_value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cell_index_at(row, col)
            .and_then(|idx| self.cells.get(idx))
            .map(|cd| &cd.cell.value)
    }
}
