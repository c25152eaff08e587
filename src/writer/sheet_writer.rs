//! Generates worksheet XML from a `Sheet` struct.
//!
//! Text cells are written as inline strings (`t="inlineStr"`), so generated
//! workbooks carry no shared string table. Sizing is written back in the
//! template's native units (grid units for columns, points for rows).

use crate::cell_ref::{col_to_letter, format_cell_ref};
use crate::error::Result;
use crate::types::{Cell, CellValue, Sheet};

use super::xml_escape;

/// Write a complete worksheet XML string from a `Sheet`.
///
/// `has_drawing` appends the `<drawing r:id="rId1"/>` reference; the
/// matching relationship part is the package writer's job.
pub(crate) fn write_sheet_xml(sheet: &Sheet, has_drawing: bool) -> Result<String> {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    if sheet.max_row > 0 || sheet.max_col > 0 {
        let end_col = col_to_letter(sheet.max_col.saturating_sub(1));
        out.push_str(&format!("<dimension ref=\"A1:{}{}\"/>\n", end_col, sheet.max_row));
    }

    // <sheetFormatPr>
    out.push_str(&format!(
        "<sheetFormatPr defaultRowHeight=\"{:.2}\" defaultColWidth=\"{:.4}\"/>\n",
        sheet.default_row_height, sheet.default_col_width
    ));

    // <cols>
    if !sheet.col_widths.is_empty() {
        out.push_str("<cols>\n");
        for cw in &sheet.col_widths {
            let col1 = cw.col + 1; // XLSX is 1-based
            out.push_str(&format!(
                "<col min=\"{}\" max=\"{}\" width=\"{:.4}\" customWidth=\"1\"/>\n",
                col1, col1, cw.width
            ));
        }
        out.push_str("</cols>\n");
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet);
    out.push_str("</sheetData>\n");

    // <mergeCells>
    if !sheet.merges.is_empty() {
        out.push_str(&format!("<mergeCells count=\"{}\">\n", sheet.merges.len()));
        for merge in &sheet.merges {
            let start_col = col_to_letter(merge.start_col);
            let end_col = col_to_letter(merge.end_col);
            out.push_str(&format!(
                "<mergeCell ref=\"{}{}:{}{}\"/>\n",
                start_col,
                merge.start_row + 1,
                end_col,
                merge.end_row + 1
            ));
        }
        out.push_str("</mergeCells>\n");
    }

    if has_drawing {
        out.push_str("<drawing r:id=\"rId1\"/>\n");
    }

    out.push_str("</worksheet>");
    Ok(out)
}

/// Write all cell rows into `<sheetData>`.
///
/// Rows that carry only a custom height (no cells) are still emitted, so
/// cloned body regions keep their sizing.
fn write_sheet_data(out: &mut String, sheet: &Sheet) {
    // Document order is not guaranteed after substitution passes; sort.
    let mut order: Vec<usize> = (0..sheet.cells.len()).collect();
    order.sort_by_key(|&i| sheet.cells.get(i).map(|cd| (cd.r, cd.c)).unwrap_or((0, 0)));

    // Group cells by row
    let mut rows: Vec<(u32, Vec<usize>)> = Vec::new();
    for idx in order {
        let Some(cd) = sheet.cells.get(idx) else {
            continue;
        };
        if let Some(last) = rows.last_mut() {
            if last.0 == cd.r {
                last.1.push(idx);
                continue;
            }
        }
        rows.push((cd.r, vec![idx]));
    }

    // Height-only rows
    for rh in &sheet.row_heights {
        if !rows.iter().any(|(r, _)| *r == rh.row) {
            rows.push((rh.row, Vec::new()));
        }
    }
    rows.sort_by_key(|(r, _)| *r);

    for (row, cell_indices) in &rows {
        // Check for custom row height
        let ht = sheet
            .row_heights
            .iter()
            .find(|rh| rh.row == *row)
            .map(|rh| rh.height);

        out.push_str(&format!("<row r=\"{}\"", row + 1));
        if let Some(h) = ht {
            out.push_str(&format!(" ht=\"{h:.2}\" customHeight=\"1\""));
        }
        out.push('>');

        for &idx in cell_indices {
            if let Some(cd) = sheet.cells.get(idx) {
                write_cell(out, cd.r, cd.c, &cd.cell);
            }
        }

        out.push_str("</row>\n");
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, row: u32, col: u32, cell: &Cell) {
    let cell_ref = format_cell_ref(row, col);

    out.push_str(&format!("<c r=\"{cell_ref}\""));

    // Style index
    if let Some(si) = cell.style_idx {
        out.push_str(&format!(" s=\"{si}\""));
    }

    match &cell.value {
        CellValue::Text(s) => {
            if let Some(ref f) = cell.formula {
                // A formula with a cached string result uses t="str";
                // inline strings cannot carry formulas.
                out.push_str(" t=\"str\">");
                out.push_str(&format!("<f>{}</f>", xml_escape(f)));
                out.push_str(&format!("<v>{}</v>", xml_escape(s)));
            } else {
                out.push_str(" t=\"inlineStr\">");
                out.push_str(&format!(
                    "<is><t xml:space=\"preserve\">{}</t></is>",
                    xml_escape(s)
                ));
            }
        }
        CellValue::Number(n) => {
            out.push('>');
            if let Some(ref f) = cell.formula {
                out.push_str(&format!("<f>{}</f>", xml_escape(f)));
            }
            out.push_str(&format!("<v>{n}</v>"));
        }
        CellValue::Boolean(b) => {
            out.push_str(" t=\"b\">");
            if let Some(ref f) = cell.formula {
                out.push_str(&format!("<f>{}</f>", xml_escape(f)));
            }
            out.push_str(&format!("<v>{}</v>", i32::from(*b)));
        }
        CellValue::Error(e) => {
            out.push_str(" t=\"e\">");
            if let Some(ref f) = cell.formula {
                out.push_str(&format!("<f>{}</f>", xml_escape(f)));
            }
            out.push_str(&format!("<v>{}</v>", xml_escape(e)));
        }
        CellValue::Empty => {
            out.push('>');
            if let Some(ref f) = cell.formula {
                out.push_str(&format!("<f>{}</f>", xml_escape(f)));
            }
        }
    }

    out.push_str("</c>");
}
