//! Worksheet parsing - parses individual sheet XML into Sheet structs.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_or_default;
use crate::error::{Result, SheetforgeError};
use crate::types::{Cell, CellData, CellValue, ColWidth, MergeRange, RowHeight, Sheet};

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    seen.then_some(num)
}

fn parse_f64_attr(value: &[u8]) -> Option<f64> {
    std::str::from_utf8(value).ok().and_then(|s| s.parse().ok())
}

/// Parse a merge range like "A1:B2"
fn parse_merge_ref(ref_str: &str) -> Option<MergeRange> {
    let (start_part, end_part) = ref_str.split_once(':')?;

    let (start_col, start_row) = parse_cell_ref_or_default(start_part);
    let (end_col, end_row) = parse_cell_ref_or_default(end_part);

    Some(MergeRange {
        start_row,
        start_col,
        end_row,
        end_col,
    })
}

/// Parse a single worksheet part into the engine's sheet model.
#[allow(clippy::too_many_lines)]
pub(super) fn parse_sheet<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    name: &str,
    shared_strings: &[String],
) -> Result<Sheet> {
    let file = archive
        .by_name(path)
        .map_err(|e| SheetforgeError::Template(format!("missing sheet part {path}: {e}")))?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut sheet = Sheet::new(name);

    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();
    let mut text_buf = Vec::new();
    let mut current_row: u32 = 0;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_start_event = matches!(event, Event::Start(_));
                let local_name = e.local_name();

                match local_name.as_ref() {
                    b"sheetFormatPr" => {
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"defaultColWidth" => {
                                    if let Some(w) = parse_f64_attr(&attr.value) {
                                        sheet.default_col_width = w;
                                    }
                                }
                                b"defaultRowHeight" => {
                                    if let Some(h) = parse_f64_attr(&attr.value) {
                                        sheet.default_row_height = h;
                                    }
                                }
                                _ => {}
                            }
                        }
                    }

                    b"row" => {
                        let mut row_height: Option<f64> = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    current_row = parse_u32_bytes(&attr.value).unwrap_or(0);
                                }
                                b"ht" => {
                                    row_height = parse_f64_attr(&attr.value);
                                }
                                _ => {}
                            }
                        }

                        if let Some(ht) = row_height {
                            sheet.row_heights.push(RowHeight {
                                row: current_row.saturating_sub(1),
                                height: ht,
                            });
                        }

                        if current_row > sheet.max_row {
                            sheet.max_row = current_row;
                        }
                    }

                    b"c" => {
                        let mut col: u32 = 0;
                        let mut row: u32 = 0;
                        let mut cell_type = CellTypeTag::Default;
                        let mut style_idx: Option<u32> = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    if let Ok(s) = std::str::from_utf8(&attr.value) {
                                        let (c, r) = parse_cell_ref_or_default(s);
                                        col = c;
                                        row = r;
                                    }
                                }
                                b"t" => {
                                    cell_type = parse_cell_type_tag(&attr.value);
                                }
                                b"s" => {
                                    style_idx = parse_u32_bytes(&attr.value);
                                }
                                _ => {}
                            }
                        }

                        // Read value/formula from child elements. Self-closing
                        // cells like <c r="A1" s="2"/> carry neither.
                        let mut value: Option<String> = None;
                        let mut formula: Option<String> = None;
                        if is_start_event {
                            loop {
                                cell_buf.clear();
                                match xml.read_event_into(&mut cell_buf) {
                                    Ok(Event::Start(ref inner)) => {
                                        let inner_name = inner.local_name();
                                        let inner_name = inner_name.as_ref();

                                        if inner_name == b"v" || inner_name == b"f" {
                                            let is_formula = inner_name == b"f";
                                            text_buf.clear();
                                            if let Ok(Event::Text(text)) =
                                                xml.read_event_into(&mut text_buf)
                                            {
                                                let s =
                                                    text.unescape().ok().map(|s| s.to_string());
                                                if is_formula {
                                                    formula = s;
                                                } else {
                                                    value = s;
                                                }
                                            }
                                        } else if inner_name == b"is" {
                                            value = read_inline_string(&mut xml);
                                        }
                                    }
                                    Ok(Event::End(ref inner)) => {
                                        if inner.local_name().as_ref() == b"c" {
                                            break;
                                        }
                                    }
                                    Ok(Event::Eof) | Err(_) => break,
                                    _ => {}
                                }
                            }
                        }

                        let cell_value =
                            resolve_cell_value(value.as_deref(), cell_type, shared_strings);

                        // Cells with neither content nor style are noise.
                        if cell_value == CellValue::Empty
                            && style_idx.is_none()
                            && formula.is_none()
                        {
                            continue;
                        }

                        if col + 1 > sheet.max_col {
                            sheet.max_col = col + 1;
                        }
                        if row + 1 > sheet.max_row {
                            sheet.max_row = row + 1;
                        }

                        sheet.cells.push(CellData {
                            r: row,
                            c: col,
                            cell: Cell {
                                value: cell_value,
                                style_idx,
                                formula,
                            },
                        });
                    }

                    b"col" => {
                        let mut min: u32 = 0;
                        let mut max: u32 = 0;
                        let mut width: Option<f64> = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"min" => min = parse_u32_bytes(&attr.value).unwrap_or(0),
                                b"max" => max = parse_u32_bytes(&attr.value).unwrap_or(0),
                                b"width" => width = parse_f64_attr(&attr.value),
                                _ => {}
                            }
                        }

                        if let Some(width) = width {
                            for col in min..=max {
                                sheet.col_widths.push(ColWidth {
                                    col: col.saturating_sub(1),
                                    width,
                                });
                            }
                        }
                    }

                    b"mergeCell" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"ref" {
                                if let Ok(ref_str) = std::str::from_utf8(&attr.value) {
                                    if let Some(merge) = parse_merge_ref(ref_str) {
                                        sheet.merges.push(merge);
                                    }
                                }
                            }
                        }
                    }

                    _ => {}
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheet)
}

/// Read an inline string container `<is><t>text</t></is>`.
fn read_inline_string<R: std::io::BufRead>(xml: &mut Reader<R>) -> Option<String> {
    let mut buf = Vec::new();
    let mut out: Option<String> = None;
    let mut in_t = false;

    loop {
        buf.clear();
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref inner)) => {
                if inner.local_name().as_ref() == b"t" {
                    in_t = true;
                }
            }
            Ok(Event::Text(ref text)) if in_t => {
                if let Ok(s) = text.unescape() {
                    out.get_or_insert_with(String::new).push_str(&s);
                }
            }
            Ok(Event::End(ref inner)) => match inner.local_name().as_ref() {
                b"t" => in_t = false,
                b"is" => break,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    out
}

/// Resolve the raw `<v>` text and type tag into an owned cell value.
fn resolve_cell_value(
    value: Option<&str>,
    tag: CellTypeTag,
    shared_strings: &[String],
) -> CellValue {
    let Some(raw) = value else {
        return CellValue::Empty;
    };

    match tag {
        CellTypeTag::Shared => {
            let resolved = raw
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared_strings.get(idx).cloned());
            CellValue::Text(resolved.unwrap_or_default())
        }
        CellTypeTag::Inline | CellTypeTag::Str => CellValue::Text(raw.to_string()),
        CellTypeTag::Bool => CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true")),
        CellTypeTag::Error => CellValue::Error(raw.to_string()),
        CellTypeTag::Default => match raw.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(raw.to_string()),
        },
    }
}
