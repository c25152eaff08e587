//! XLSX package writer.
//!
//! Serializes the assembled workbook into a complete package: content
//! types, relationships, workbook part, one worksheet part per sheet, and
//! for sheets with placed pictures a drawing part plus media files. The
//! template's styles and theme are passed through byte-identical so clones
//! keep their formatting.

pub(crate) mod drawing_writer;
pub(crate) mod sheet_writer;

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::types::Workbook;

use drawing_writer::write_drawing_xml;
use sheet_writer::write_sheet_xml;

/// Serialize a workbook to XLSX bytes.
///
/// # Errors
/// Any failure here is fatal to the generation run; the caller never
/// receives a partially written package.
pub fn write_xlsx(workbook: &Workbook) -> Result<Vec<u8>> {
    let buf: Vec<u8> = Vec::with_capacity(16 * 1024);
    let mut zip = ZipWriter::new(Cursor::new(buf));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let plan = PackagePlan::new(workbook);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(plan.content_types_xml(workbook).as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml(workbook).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(workbook_rels_xml(workbook).as_bytes())?;

    zip.start_file("xl/styles.xml", options)?;
    match &workbook.styles_xml {
        Some(bytes) => zip.write_all(bytes)?,
        None => zip.write_all(MINIMAL_STYLES_XML.as_bytes())?,
    }

    if let Some(theme) = &workbook.theme_xml {
        zip.start_file("xl/theme/theme1.xml", options)?;
        zip.write_all(theme)?;
    }

    let mut media_no = 0_usize;
    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        let sheet_no = idx + 1;
        let drawing_no = plan.drawing_no(idx);

        zip.start_file(format!("xl/worksheets/sheet{sheet_no}.xml"), options)?;
        zip.write_all(write_sheet_xml(sheet, drawing_no.is_some())?.as_bytes())?;

        let Some(drawing_no) = drawing_no else {
            continue;
        };

        // Worksheet -> drawing relationship
        zip.start_file(
            format!("xl/worksheets/_rels/sheet{sheet_no}.xml.rels"),
            options,
        )?;
        zip.write_all(sheet_rels_xml(drawing_no).as_bytes())?;

        // Drawing part
        zip.start_file(format!("xl/drawings/drawing{drawing_no}.xml"), options)?;
        zip.write_all(write_drawing_xml(&sheet.pictures)?.as_bytes())?;

        // Drawing -> media relationships, plus the media files themselves
        let mut rels = String::with_capacity(256);
        rels.push_str(RELS_HEADER);
        for (pic_idx, pic) in sheet.pictures.iter().enumerate() {
            media_no += 1;
            let media_name = format!("image{media_no}.{}", pic.format.extension());
            rels.push_str(&format!(
                "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" Target=\"../media/{media_name}\"/>\n",
                pic_idx + 1
            ));

            zip.start_file(format!("xl/media/{media_name}"), options)?;
            zip.write_all(&pic.data)?;
        }
        rels.push_str("</Relationships>");

        zip.start_file(format!("xl/drawings/_rels/drawing{drawing_no}.xml.rels"), options)?;
        zip.write_all(rels.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Part numbering decided up front: which sheets carry drawings and what
/// media extensions appear anywhere in the package.
struct PackagePlan {
    /// For each sheet index, its 1-based drawing number (None = no pictures).
    drawing_nos: Vec<Option<usize>>,
}

impl PackagePlan {
    fn new(workbook: &Workbook) -> Self {
        let mut next = 0_usize;
        let drawing_nos = workbook
            .sheets
            .iter()
            .map(|s| {
                if s.pictures.is_empty() {
                    None
                } else {
                    next += 1;
                    Some(next)
                }
            })
            .collect();
        PackagePlan { drawing_nos }
    }

    fn drawing_no(&self, sheet_idx: usize) -> Option<usize> {
        self.drawing_nos.get(sheet_idx).copied().flatten()
    }

    fn content_types_xml(&self, workbook: &Workbook) -> String {
        let mut out = String::with_capacity(1024);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        out.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        out.push('\n');
        out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        out.push('\n');
        out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        out.push('\n');

        // One Default per image extension in use
        let mut seen_exts: Vec<&str> = Vec::new();
        for sheet in &workbook.sheets {
            for pic in &sheet.pictures {
                let ext = pic.format.extension();
                if !seen_exts.contains(&ext) {
                    seen_exts.push(ext);
                    out.push_str(&format!(
                        "<Default Extension=\"{ext}\" ContentType=\"{}\"/>\n",
                        pic.format.mime_type()
                    ));
                }
            }
        }

        out.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
        out.push('\n');
        out.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
        out.push('\n');
        if workbook.theme_xml.is_some() {
            out.push_str(r#"<Override PartName="/xl/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
            out.push('\n');
        }

        for idx in 0..workbook.sheets.len() {
            out.push_str(&format!(
                "<Override PartName=\"/xl/worksheets/sheet{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\n",
                idx + 1
            ));
            if let Some(drawing_no) = self.drawing_no(idx) {
                out.push_str(&format!(
                    "<Override PartName=\"/xl/drawings/drawing{drawing_no}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.drawing+xml\"/>\n",
                ));
            }
        }

        out.push_str("</Types>");
        out
    }
}

const RELS_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    "\n"
);

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    "\n",
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    "\n",
    "</Relationships>"
);

/// Fallback styles part for templates that somehow carried none.
const MINIMAL_STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="1"><fill><patternFill patternType="none"/></fill></fills>"#,
    r#"<borders count="1"><border/></borders>"#,
    r#"<cellStyleXfs count="1"><xf/></cellStyleXfs>"#,
    r#"<cellXfs count="1"><xf xfId="0"/></cellXfs>"#,
    "</styleSheet>"
);

fn workbook_xml(workbook: &Workbook) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    out.push('\n');
    out.push_str("<sheets>\n");
    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        out.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>\n",
            xml_escape(&sheet.name),
            idx + 1,
            idx + 1
        ));
    }
    out.push_str("</sheets>\n</workbook>");
    out
}

fn workbook_rels_xml(workbook: &Workbook) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(RELS_HEADER);
    for idx in 0..workbook.sheets.len() {
        out.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{}.xml\"/>\n",
            idx + 1,
            idx + 1
        ));
    }
    let styles_rid = workbook.sheets.len() + 1;
    out.push_str(&format!(
        "<Relationship Id=\"rId{styles_rid}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\n"
    ));
    if workbook.theme_xml.is_some() {
        out.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme\" Target=\"theme/theme1.xml\"/>\n",
            styles_rid + 1
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn sheet_rels_xml(drawing_no: usize) -> String {
    format!(
        "{RELS_HEADER}<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing\" Target=\"../drawings/drawing{drawing_no}.xml\"/>\n</Relationships>"
    )
}

/// Minimal XML escaping for attribute/text content.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
