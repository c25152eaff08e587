//! Test fixtures for generating valid XLSX templates in memory, plus
//! helpers for inspecting generated packages.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use sheetforge::{CellValue, Entry, ParamKind, ParameterSpec, Workbook};

// ============================================================================
// Template Builder
// ============================================================================

/// A cell in the template under construction.
struct TemplateCell {
    cell_ref: String,
    text: String,
    style_idx: Option<u32>,
}

/// Builder for creating single-sheet XLSX templates programmatically.
///
/// Cells are written as inline strings; merges, column widths, and row
/// heights map straight to the corresponding worksheet elements.
pub struct TemplateBuilder {
    sheet_name: String,
    cells: Vec<TemplateCell>,
    merges: Vec<String>,
    col_widths: Vec<(u32, f64)>,
    row_heights: Vec<(u32, f64)>,
}

impl TemplateBuilder {
    #[must_use]
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            cells: Vec::new(),
            merges: Vec::new(),
            col_widths: Vec::new(),
            row_heights: Vec::new(),
        }
    }

    /// Add a text cell at a reference like "A1".
    #[must_use]
    pub fn cell(mut self, cell_ref: &str, text: &str) -> Self {
        self.cells.push(TemplateCell {
            cell_ref: cell_ref.to_string(),
            text: text.to_string(),
            style_idx: None,
        });
        self
    }

    /// Add a text cell carrying a style index.
    #[must_use]
    pub fn styled_cell(mut self, cell_ref: &str, text: &str, style_idx: u32) -> Self {
        self.cells.push(TemplateCell {
            cell_ref: cell_ref.to_string(),
            text: text.to_string(),
            style_idx: Some(style_idx),
        });
        self
    }

    /// Add a merged range like "A1:C2".
    #[must_use]
    pub fn merge(mut self, range: &str) -> Self {
        self.merges.push(range.to_string());
        self
    }

    /// Set a column width in grid units (1-indexed column).
    #[must_use]
    pub fn col_width(mut self, col: u32, width: f64) -> Self {
        self.col_widths.push((col, width));
        self
    }

    /// Set a row height in points (1-indexed row).
    #[must_use]
    pub fn row_height(mut self, row: u32, height: f64) -> Self {
        self.row_heights.push((row, height));
        self
    }

    /// Serialize the template into XLSX bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(CONTENT_TYPES_XML.as_bytes()).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(ROOT_RELS_XML.as_bytes()).unwrap();

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
                self.sheet_name
            )
            .as_bytes(),
        )
        .unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(WORKBOOK_RELS_XML.as_bytes()).unwrap();

        zip.start_file("xl/styles.xml", options).unwrap();
        zip.write_all(STYLES_XML.as_bytes()).unwrap();

        zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
        zip.write_all(self.sheet_xml().as_bytes()).unwrap();

        zip.finish().unwrap().into_inner()
    }

    fn sheet_xml(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        out.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        out.push('\n');

        if !self.col_widths.is_empty() {
            out.push_str("<cols>");
            for (col, width) in &self.col_widths {
                out.push_str(&format!(
                    r#"<col min="{col}" max="{col}" width="{width}" customWidth="1"/>"#
                ));
            }
            out.push_str("</cols>\n");
        }

        // Group cells by row number in insertion order
        let mut rows: Vec<(u32, Vec<&TemplateCell>)> = Vec::new();
        for cell in &self.cells {
            let row = row_of(&cell.cell_ref);
            if let Some(entry) = rows.iter_mut().find(|(r, _)| *r == row) {
                entry.1.push(cell);
            } else {
                rows.push((row, vec![cell]));
            }
        }
        rows.sort_by_key(|(r, _)| *r);

        out.push_str("<sheetData>\n");
        for (row, cells) in &rows {
            let ht = self
                .row_heights
                .iter()
                .find(|(r, _)| r == row)
                .map(|(_, h)| *h);
            out.push_str(&format!("<row r=\"{row}\""));
            if let Some(h) = ht {
                out.push_str(&format!(" ht=\"{h}\" customHeight=\"1\""));
            }
            out.push('>');
            for cell in cells {
                let style = cell
                    .style_idx
                    .map(|s| format!(" s=\"{s}\""))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "<c r=\"{}\"{} t=\"inlineStr\"><is><t>{}</t></is></c>",
                    cell.cell_ref,
                    style,
                    escape(&cell.text)
                ));
            }
            out.push_str("</row>\n");
        }
        // Rows that only have a height
        for (row, height) in &self.row_heights {
            if !rows.iter().any(|(r, _)| r == row) {
                out.push_str(&format!(
                    "<row r=\"{row}\" ht=\"{height}\" customHeight=\"1\"></row>\n"
                ));
            }
        }
        out.push_str("</sheetData>\n");

        if !self.merges.is_empty() {
            out.push_str(&format!("<mergeCells count=\"{}\">", self.merges.len()));
            for merge in &self.merges {
                out.push_str(&format!("<mergeCell ref=\"{merge}\"/>"));
            }
            out.push_str("</mergeCells>\n");
        }

        out.push_str("</worksheet>");
        out
    }
}

fn row_of(cell_ref: &str) -> u32 {
    cell_ref
        .chars()
        .skip_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .parse()
        .unwrap()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><sz val="14"/><b/><name val="Calibri"/></font></fonts>
<fills count="1"><fill><patternFill patternType="none"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf/></cellStyleXfs>
<cellXfs count="2"><xf xfId="0"/><xf xfId="0" fontId="1"/></cellXfs>
</styleSheet>"#;

// ============================================================================
// Schema / Entry Helpers
// ============================================================================

#[must_use]
pub fn text_param(name: &str) -> ParameterSpec {
    ParameterSpec {
        name: name.to_string(),
        kind: ParamKind::Text,
        original_text: String::new(),
        anchor_cell: None,
    }
}

#[must_use]
pub fn image_param(name: &str, original_text: &str, anchor: (u32, u32)) -> ParameterSpec {
    ParameterSpec {
        name: name.to_string(),
        kind: ParamKind::Image,
        original_text: original_text.to_string(),
        anchor_cell: Some(anchor),
    }
}

#[must_use]
pub fn entry(id: &str, date: &str, data: &[(&str, &str)]) -> Entry {
    let mut map: HashMap<String, Option<String>> = HashMap::new();
    for (k, v) in data {
        map.insert((*k).to_string(), Some((*v).to_string()));
    }
    Entry {
        id: id.to_string(),
        date: date.to_string(),
        data: map,
    }
}

// ============================================================================
// Image Fixtures
// ============================================================================

/// A syntactically valid PNG header with the given dimensions. Only the
/// signature and IHDR chunk matter for dimension probing.
#[must_use]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0]); // bit depth, color type, etc.
    data.extend_from_slice(&[0, 0, 0, 0]); // CRC placeholder
    data
}

// ============================================================================
// Output Inspection Helpers
// ============================================================================

/// Parse generated XLSX bytes back into the engine's workbook model.
#[must_use]
pub fn read_back(xlsx: &[u8]) -> Workbook {
    sheetforge::parser::parse(xlsx).expect("generated workbook should parse")
}

/// All part names inside a generated package.
#[must_use]
pub fn zip_part_names(xlsx: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(xlsx)).expect("generated bytes should be a zip");
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Read one package part as a UTF-8 string.
#[must_use]
pub fn zip_part(xlsx: &[u8], path: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(xlsx)).expect("generated bytes should be a zip");
    let mut file = archive
        .by_name(path)
        .unwrap_or_else(|_| panic!("part {path} not found"));
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

/// The text value of a cell on a sheet, if it is a text cell.
#[must_use]
pub fn cell_text(workbook: &Workbook, sheet: usize, row: u32, col: u32) -> Option<String> {
    let sheet = workbook.sheets.get(sheet)?;
    match sheet.cell_value(row, col)? {
        CellValue::Text(s) => Some(s.clone()),
        _ => None,
    }
}

/// The numeric value of a cell on a sheet, if it is a number cell.
#[must_use]
pub fn cell_number(workbook: &Workbook, sheet: usize, row: u32, col: u32) -> Option<f64> {
    let sheet = workbook.sheets.get(sheet)?;
    match sheet.cell_value(row, col)? {
        CellValue::Number(n) => Some(*n),
        _ => None,
    }
}
