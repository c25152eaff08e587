//! Grid geometry lookups over a sheet's merged ranges and sizing.
//!
//! Answers two questions for the layout planner: which merged range (if any)
//! contains a given cell, and how large a range is in pixels. Merged-range
//! lookup is a linear scan; template-scale sheets carry tens to low hundreds
//! of ranges, so an interval index would be overkill.

use crate::types::{MergeRange, Sheet};
use crate::units::{grid_units_to_pixels, points_to_pixels};

/// First merged range whose bounds include (row, col), if any.
/// Indices are 0-based.
#[must_use]
pub fn find_containing_range(sheet: &Sheet, row: u32, col: u32) -> Option<MergeRange> {
    sheet.merges.iter().copied().find(|r| r.contains(row, col))
}

/// Merged range that starts exactly at `row` in column `col`, if any.
/// Used to locate the body region directly below a header.
#[must_use]
pub fn find_range_starting_at(sheet: &Sheet, row: u32, col: u32) -> Option<MergeRange> {
    sheet
        .merges
        .iter()
        .copied()
        .find(|r| r.start_row == row && r.start_col == col)
}

/// Pixel width and height of a range, substituting sheet defaults for
/// unsized columns/rows.
#[must_use]
pub fn box_pixel_size(sheet: &Sheet, range: &MergeRange) -> (f64, f64) {
    let width = (range.start_col..=range.end_col)
        .map(|c| grid_units_to_pixels(sheet.col_width_units(c)))
        .sum();
    let height = (range.start_row..=range.end_row)
        .map(|r| points_to_pixels(sheet.row_height_points(r)))
        .sum();
    (width, height)
}

/// Total height of a range in points (header classification works in point
/// space, not pixels).
#[must_use]
pub fn box_height_points(sheet: &Sheet, range: &MergeRange) -> f64 {
    (range.start_row..=range.end_row)
        .map(|r| sheet.row_height_points(r))
        .sum()
}
