//! Layout planning for image placement.
//!
//! Given an anchor cell and an image's native pixel size, decides where the
//! image actually lands: a short "header" region redirects the image to the
//! taller "body" region directly beneath it, the image is aspect-fit inside
//! the padded target box, and the remaining slack becomes a centering offset
//! carried in EMU on the final anchor.

use crate::geometry::{
    box_height_points, box_pixel_size, find_containing_range, find_range_starting_at,
};
use crate::types::{MergeRange, PictureAnchor, Sheet};
use crate::units::{
    pixels_to_emu, HEADER_MAX_HEIGHT_PT, MAX_PADDING_PX, MIN_FIT_BOX_PX, PADDING_RATIO,
};

/// Where the image ended up relative to the requested anchor.
///
/// The single place the header/body decision is made; both image insertion
/// and placeholder-text restoration consume this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The anchor region was a short header; the image moved to the merged
    /// range starting directly below it.
    Redirected { target_box: MergeRange },
    /// The image stayed in the anchor's own region (or single cell).
    NotRedirected { target_box: MergeRange },
}

impl Target {
    /// The box the image was fitted into.
    #[must_use]
    pub fn target_box(&self) -> MergeRange {
        match self {
            Target::Redirected { target_box } | Target::NotRedirected { target_box } => *target_box,
        }
    }

    /// Whether the image moved out of the anchor region.
    #[must_use]
    pub fn is_redirected(&self) -> bool {
        matches!(self, Target::Redirected { .. })
    }
}

/// A complete placement decision for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutDecision {
    /// Final one-cell anchor: 0-indexed cell, EMU offsets, EMU extent.
    pub anchor: PictureAnchor,
    /// Header/body outcome.
    pub target: Target,
    /// Final image size in pixels (pre-EMU), for diagnostics and tests.
    pub size_px: (f64, f64),
    /// Centering offset in pixels (pre-EMU), for diagnostics and tests.
    pub offset_px: (f64, f64),
}

impl LayoutDecision {
    /// Whether the image was redirected from a header to the body below it.
    #[must_use]
    pub fn redirected(&self) -> bool {
        self.target.is_redirected()
    }
}

/// Plan the placement of an image anchored at (row, col), 0-indexed.
///
/// `native_w`/`native_h` are the image's pixel dimensions. A target box at
/// or below [`MIN_FIT_BOX_PX`] on either axis cannot be meaningfully fitted;
/// the image is then inserted unscaled at the unmodified anchor cell.
#[must_use]
pub fn plan_placement(
    sheet: &Sheet,
    row: u32,
    col: u32,
    native_w: u32,
    native_h: u32,
) -> LayoutDecision {
    let anchor_range = find_containing_range(sheet, row, col);

    // Header redirection only applies when the anchor sits in a real merged
    // range; a bare cell is its own 1x1 target with no redirection.
    let (target, anchor_row, anchor_col) = match anchor_range {
        Some(rng) if box_height_points(sheet, &rng) < HEADER_MAX_HEIGHT_PT => {
            match find_range_starting_at(sheet, rng.end_row + 1, col) {
                Some(body) => (Target::Redirected { target_box: body }, body.start_row, col),
                None => (Target::NotRedirected { target_box: rng }, row, col),
            }
        }
        Some(rng) => (Target::NotRedirected { target_box: rng }, row, col),
        None => (
            Target::NotRedirected {
                target_box: MergeRange::single(row, col),
            },
            row,
            col,
        ),
    };

    let (box_w, box_h) = box_pixel_size(sheet, &target.target_box());

    if box_w <= MIN_FIT_BOX_PX || box_h <= MIN_FIT_BOX_PX || native_w == 0 || native_h == 0 {
        // Unfittable box: unscaled image at the original anchor cell.
        let (w, h) = (f64::from(native_w), f64::from(native_h));
        return LayoutDecision {
            anchor: PictureAnchor {
                col,
                row,
                col_off: 0,
                row_off: 0,
                extent_cx: pixels_to_emu(w),
                extent_cy: pixels_to_emu(h),
            },
            target: Target::NotRedirected {
                target_box: target.target_box(),
            },
            size_px: (w, h),
            offset_px: (0.0, 0.0),
        };
    }

    let (img_w, img_h) = aspect_fit(f64::from(native_w), f64::from(native_h), box_w, box_h);

    let offset_x = ((box_w - img_w) / 2.0).max(0.0);
    let offset_y = ((box_h - img_h) / 2.0).max(0.0);

    LayoutDecision {
        anchor: PictureAnchor {
            col: anchor_col,
            row: anchor_row,
            col_off: pixels_to_emu(offset_x),
            row_off: pixels_to_emu(offset_y),
            extent_cx: pixels_to_emu(img_w),
            extent_cy: pixels_to_emu(img_h),
        },
        target,
        size_px: (img_w, img_h),
        offset_px: (offset_x, offset_y),
    }
}

/// Fit an image into a padded box, preserving aspect ratio exactly.
///
/// Padding per axis is 10% of the box dimension, capped at 20 px. The wider
/// of image vs. box ratios decides which axis binds.
fn aspect_fit(native_w: f64, native_h: f64, box_w: f64, box_h: f64) -> (f64, f64) {
    let pad_w = MAX_PADDING_PX.min(box_w * PADDING_RATIO);
    let pad_h = MAX_PADDING_PX.min(box_h * PADDING_RATIO);
    let avail_w = box_w - pad_w;
    let avail_h = box_h - pad_h;

    let img_ratio = native_w / native_h;
    let box_ratio = box_w / box_h;

    if img_ratio > box_ratio {
        // Image is relatively wider: width binds.
        (avail_w, avail_w / img_ratio)
    } else {
        // Height binds.
        (avail_h * img_ratio, avail_h)
    }
}
