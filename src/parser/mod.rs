//! Template workbook parser.
//!
//! Reads the parts of an XLSX package the assembly engine needs: the sheet
//! list, shared strings (resolved into owned cell text), per-sheet cells,
//! merged ranges, and row/column sizing. Styles and theme are captured as
//! raw bytes and passed through verbatim on save.

mod worksheet;

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read};
use zip::ZipArchive;

use crate::error::{Result, SheetforgeError};
use crate::types::Workbook;

use worksheet::parse_sheet;

/// Sheet metadata from workbook.xml
struct SheetInfo {
    name: String,
    path: String,
}

/// Parse an XLSX template from raw bytes.
///
/// # Errors
/// Returns an error if the package is not a readable XLSX archive or its
/// workbook part is malformed. A template with zero sheets is rejected here;
/// every downstream step assumes a scaffold sheet exists.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)
        .map_err(|e| SheetforgeError::Template(format!("not a readable XLSX package: {e}")))?;

    let rels = parse_workbook_rels(&mut archive)?;
    let sheet_infos = parse_workbook_xml(&mut archive, &rels)?;
    if sheet_infos.is_empty() {
        return Err(SheetforgeError::Template(
            "template workbook contains no sheets".into(),
        ));
    }

    let shared_strings = parse_shared_strings(&mut archive)?;

    let mut workbook = Workbook {
        sheets: Vec::with_capacity(sheet_infos.len()),
        styles_xml: read_raw_part(&mut archive, "xl/styles.xml"),
        theme_xml: read_raw_part(&mut archive, "xl/theme/theme1.xml"),
    };

    for info in &sheet_infos {
        let sheet = parse_sheet(&mut archive, &info.path, &info.name, &shared_strings)?;
        workbook.sheets.push(sheet);
    }

    Ok(workbook)
}

/// Read a package part's raw bytes, if present.
fn read_raw_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Option<Vec<u8>> {
    let mut file = archive.by_name(path).ok()?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).ok()?;
    Some(buf)
}

/// Parse xl/_rels/workbook.xml.rels into rId -> package path.
fn parse_workbook_rels<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<HashMap<String, String>> {
    let mut rels = HashMap::new();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return Ok(rels);
    };
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr_string(&attr.value),
                        b"Target" => target = attr_string(&attr.value),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    rels.insert(id, normalize_target(&target));
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Resolve a workbook-relative relationship target to a package path.
fn normalize_target(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Parse xl/workbook.xml into the ordered sheet list.
fn parse_workbook_xml<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    rels: &HashMap<String, String>,
) -> Result<Vec<SheetInfo>> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|e| SheetforgeError::Template(format!("missing xl/workbook.xml: {e}")))?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut infos = Vec::new();
    let mut buf = Vec::new();
    let mut fallback_idx = 0_u32;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rid = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = attr_string(&attr.value),
                        b"r:id" => rid = attr_string(&attr.value),
                        _ => {}
                    }
                }

                fallback_idx += 1;
                let path = rid
                    .as_deref()
                    .and_then(|id| rels.get(id).cloned())
                    .unwrap_or_else(|| format!("xl/worksheets/sheet{fallback_idx}.xml"));

                infos.push(SheetInfo {
                    name: name.unwrap_or_else(|| format!("Sheet{fallback_idx}")),
                    path,
                });
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(infos)
}

/// Parse xl/sharedStrings.xml into a flat string table.
///
/// Rich-text entries are flattened by concatenating their runs; the engine
/// only substitutes plain text.
fn parse_shared_strings<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<String>> {
    let mut strings = Vec::new();

    let Ok(file) = archive.by_name("xl/sharedStrings.xml") else {
        return Ok(strings);
    };
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut buf = Vec::new();
    let mut current: Option<String> = None;
    let mut in_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_t = true,
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_t => {
                if let (Some(s), Ok(text)) = (current.as_mut(), t.unescape()) {
                    s.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"si" => {
                    if let Some(s) = current.take() {
                        strings.push(s);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

fn attr_string(value: &[u8]) -> Option<String> {
    std::str::from_utf8(value).ok().map(ToString::to_string)
}
