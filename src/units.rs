//! Unit conversions between the coordinate spaces the engine touches.
//!
//! Cell grid sizing lives in two different units: column widths in Excel
//! character ("grid") units, row heights in points. Image placement needs
//! pixels, and the DrawingML anchor that finally carries the placement
//! needs EMU (English Metric Units). All conversion factors are calibration
//! constants observed from the reference renderer; keep them named so a
//! recalibration is a one-line change.

/// Pixels per Excel column-width unit.
pub const PX_PER_GRID_UNIT: f64 = 7.5;

/// Pixels per point (row heights are given in points).
pub const PX_PER_POINT: f64 = 1.333;

/// EMU per pixel. Exact by definition; feeds binary layout metadata.
pub const EMU_PER_PIXEL: f64 = 9525.0;

/// Column width applied when the template leaves a column unsized.
pub const DEFAULT_COL_WIDTH: f64 = 8.43;

/// Row height in points applied when the template leaves a row unsized.
pub const DEFAULT_ROW_HEIGHT_PT: f64 = 15.0;

/// A merged range no taller than this (in points) is treated as a header
/// label rather than an image body.
pub const HEADER_MAX_HEIGHT_PT: f64 = 60.0;

/// Fraction of a box dimension reserved as padding around a placed image.
pub const PADDING_RATIO: f64 = 0.1;

/// Upper bound on padding per axis, in pixels.
pub const MAX_PADDING_PX: f64 = 20.0;

/// Boxes at or below this size (either axis, pixels) are too small to fit
/// an image into; the image is inserted unscaled instead.
pub const MIN_FIT_BOX_PX: f64 = 10.0;

/// Convert a column width in grid units to pixels.
#[must_use]
pub fn grid_units_to_pixels(units: f64) -> f64 {
    units * PX_PER_GRID_UNIT
}

/// Convert a row height in points to pixels.
#[must_use]
pub fn points_to_pixels(points: f64) -> f64 {
    points * PX_PER_POINT
}

/// Convert pixels to EMU, rounding to the nearest whole unit.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pixels_to_emu(px: f64) -> i64 {
    (px * EMU_PER_PIXEL).round() as i64
}
