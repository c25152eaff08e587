//! In-memory workbook model the engine mutates.

mod cell;
mod drawing;
mod sheet;
mod workbook;

pub use cell::{Cell, CellData, CellValue};
pub use drawing::{ImageFormat, Picture, PictureAnchor};
pub use sheet::{ColWidth, MergeRange, RowHeight, Sheet};
pub use workbook::Workbook;
