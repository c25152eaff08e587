//! Workbook builder: the top-level generation pipeline.
//!
//! Parses the template once, clones its first sheet (the scaffold) for each
//! entry in date order, and serializes the result. Template parse and final
//! save failures are fatal; everything per-entry is handled inside the
//! assembler and never aborts the run.

use std::path::Path;

use log::info;

use crate::assemble::{assemble_entry, unique_sheet_name};
use crate::error::Result;
use crate::images::ImageStore;
use crate::parser;
use crate::schema::{Entry, ParameterSpec};
use crate::writer::write_xlsx;

/// Generate a populated workbook from a template and a batch of entries.
///
/// Entries are processed in ascending date order regardless of input order.
/// The scaffold sheet is dropped from the output once at least one entry
/// sheet exists; with zero entries the template round-trips unchanged.
///
/// # Errors
/// Fails if the template cannot be parsed or the final package cannot be
/// serialized. Per-entry image problems degrade that entry's sheet instead.
pub fn generate(
    template: &[u8],
    schema: &[ParameterSpec],
    entries: &[Entry],
    image_root: &Path,
) -> Result<Vec<u8>> {
    let mut workbook = parser::parse(template)?;
    let scaffold = workbook
        .sheets
        .first()
        .cloned()
        .ok_or("template workbook contains no sheets")?;

    let images = ImageStore::new(image_root);

    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date));

    info!(
        "generating workbook: {} entries, {} parameters",
        ordered.len(),
        schema.len()
    );

    for entry in ordered {
        let mut sheet = assemble_entry(&scaffold, schema, entry, &images);

        let taken: Vec<String> = workbook.sheets.iter().map(|s| s.name.clone()).collect();
        sheet.name = unique_sheet_name(&sheet.name, &taken);

        workbook.sheets.push(sheet);
    }

    // The scaffold served as the clone source; it only survives when no
    // entry produced a sheet.
    if workbook.sheets.len() > 1 {
        workbook.sheets.remove(0);
    }

    write_xlsx(&workbook)
}
