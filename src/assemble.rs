//! Per-entry sheet assembly: clone the scaffold, name the clone, place
//! images, fill text.
//!
//! Every per-parameter fault in here is recoverable: a missing or unreadable
//! image is logged and the placeholder falls back to its original label. The
//! workbook builder's loop never sees these faults.

use log::{debug, warn};

use crate::images::ImageStore;
use crate::layout::plan_placement;
use crate::schema::{Entry, ParamKind, ParameterSpec};
use crate::substitute::substitute;
use crate::types::{Picture, Sheet};

/// Characters a sheet name may not contain.
const FORBIDDEN_NAME_CHARS: &[char] = &[':', '/', '\\', '?', '*', '[', ']'];

/// Hard spreadsheet limit we truncate sheet names to.
const MAX_SHEET_NAME_LEN: usize = 30;

/// Build one populated sheet for `entry` by cloning the scaffold.
pub(crate) fn assemble_entry(
    scaffold: &Sheet,
    schema: &[ParameterSpec],
    entry: &Entry,
    images: &ImageStore,
) -> Sheet {
    let mut sheet = scaffold.clone();
    sheet.pictures.clear();
    sheet.name = sanitize_sheet_name(&derive_sheet_name(schema, entry));

    place_images(&mut sheet, schema, entry, images);
    fill_text(&mut sheet, schema, entry);

    sheet
}

/// Default sheet name is the month-day segment of the entry date; a
/// non-empty `sheet_name` parameter value overrides it.
fn derive_sheet_name(schema: &[ParameterSpec], entry: &Entry) -> String {
    let supplied = schema
        .iter()
        .find(|p| p.name == "sheet_name")
        .and_then(|_| entry.value("sheet_name"));

    match supplied {
        Some(name) => name.to_string(),
        None => entry.date.get(5..).unwrap_or(&entry.date).to_string(),
    }
}

/// Strip characters a sheet name may not contain and enforce the length cap.
pub(crate) fn sanitize_sheet_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORBIDDEN_NAME_CHARS.contains(c))
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

/// Make `base` unique against already-used names by appending `_2`, `_3`, …
/// while staying within the length cap. Never drops a sheet.
pub(crate) fn unique_sheet_name(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|n| n == base) {
        return base.to_string();
    }

    for n in 2_u32.. {
        let suffix = format!("_{n}");
        let room = MAX_SHEET_NAME_LEN.saturating_sub(suffix.len());
        let mut candidate: String = base.chars().take(room).collect();
        candidate.push_str(&suffix);
        if !taken.iter().any(|t| t == &candidate) {
            return candidate;
        }
    }

    base.to_string() // unreachable: the loop always finds a free suffix
}

/// Place every supplied image parameter, then clear or restore its
/// placeholder token according to the outcome.
fn place_images(sheet: &mut Sheet, schema: &[ParameterSpec], entry: &Entry, images: &ImageStore) {
    for param in schema.iter().filter(|p| p.kind == ParamKind::Image) {
        let token = param.token();
        let mut inserted = false;
        let mut redirected = false;

        if let Some(reference) = entry.value(&param.name) {
            match try_place_image(sheet, param, reference, images) {
                Ok(was_redirected) => {
                    inserted = true;
                    redirected = was_redirected;
                }
                Err(reason) => {
                    warn!(
                        "entry {}: image '{}' not inserted: {reason}",
                        entry.id, param.name
                    );
                }
            }
        }

        // Redirected: the image moved to the body, so the header keeps its
        // original label. Inserted in place: clear the placeholder. Not
        // inserted: restore the label rather than leaving a stray token.
        let replacement = if redirected || !inserted {
            param.original_text.as_str()
        } else {
            ""
        };
        let touched = substitute(sheet, &token, replacement);
        debug!(
            "entry {}: image '{}' placeholder pass touched {touched} cell(s)",
            entry.id, param.name
        );
    }
}

/// Resolve, plan, and record one image placement. Returns whether the
/// placement was redirected from a header to the body below it.
fn try_place_image(
    sheet: &mut Sheet,
    param: &ParameterSpec,
    reference: &str,
    images: &ImageStore,
) -> Result<bool, String> {
    let Some((anchor_row, anchor_col)) = param.anchor_cell else {
        return Err("no anchor cell in schema".into());
    };
    if anchor_row == 0 || anchor_col == 0 {
        return Err(format!(
            "anchor cell ({anchor_row}, {anchor_col}) is not 1-indexed"
        ));
    }

    let image = images.load(reference).map_err(|e| e.to_string())?;

    let decision = plan_placement(
        sheet,
        anchor_row - 1,
        anchor_col - 1,
        image.width,
        image.height,
    );
    debug!(
        "image '{}': anchor ({}, {}), size {:.0}x{:.0} px, offset {:.0}+{:.0} px, redirected={}",
        param.name,
        decision.anchor.row,
        decision.anchor.col,
        decision.size_px.0,
        decision.size_px.1,
        decision.offset_px.0,
        decision.offset_px.1,
        decision.redirected()
    );

    let redirected = decision.redirected();
    sheet.pictures.push(Picture {
        data: image.data,
        format: image.format,
        anchor: decision.anchor,
        name: param.name.clone(),
    });

    Ok(redirected)
}

/// One substitution pass per text parameter, in schema order.
fn fill_text(sheet: &mut Sheet, schema: &[ParameterSpec], entry: &Entry) {
    for param in schema.iter().filter(|p| p.kind == ParamKind::Text) {
        let value = entry.value(&param.name).unwrap_or("");
        let touched = substitute(sheet, &param.token(), value);
        debug!(
            "entry {}: text '{}' touched {touched} cell(s)",
            entry.id, param.name
        );
    }
}
