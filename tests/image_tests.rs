//! End-to-end photograph placement tests: drawing/media parts, header
//! redirection, and placeholder restoration on failure.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{
    cell_text, entry, image_param, png_bytes, read_back, zip_part, zip_part_names, TemplateBuilder,
};
use sheetforge::generate;

/// Template with a short merged header row and a tall merged body below it.
fn photo_section_template() -> Vec<u8> {
    TemplateBuilder::new("Template")
        .cell("A1", "{{ photo }}")
        .merge("A1:D1")
        .merge("A2:D9")
        .build()
}

#[test]
fn test_inserted_image_produces_drawing_and_media_parts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("site.png"), png_bytes(200, 100)).unwrap();

    let template = photo_section_template();
    let schema = vec![image_param("photo", "Site photo", (1, 1))];
    let entries = vec![entry("e1", "2026-01-01", &[("photo", "site.png")])];

    let xlsx = generate(&template, &schema, &entries, dir.path()).unwrap();

    let parts = zip_part_names(&xlsx);
    assert!(parts.iter().any(|p| p == "xl/drawings/drawing1.xml"));
    assert!(parts.iter().any(|p| p == "xl/media/image1.png"));
    assert!(parts
        .iter()
        .any(|p| p == "xl/worksheets/_rels/sheet1.xml.rels"));

    // Image bytes are copied into the package untouched
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(&xlsx[..])).unwrap();
    let mut media = Vec::new();
    std::io::Read::read_to_end(
        &mut archive.by_name("xl/media/image1.png").unwrap(),
        &mut media,
    )
    .unwrap();
    assert_eq!(media, png_bytes(200, 100));

    // Content types registered the png default
    let types = zip_part(&xlsx, "[Content_Types].xml");
    assert!(types.contains(r#"Extension="png""#));
}

#[test]
fn test_short_header_redirects_to_body_and_restores_label() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("site.png"), png_bytes(200, 100)).unwrap();

    let template = photo_section_template();
    let schema = vec![image_param("photo", "Site photo", (1, 1))];
    let entries = vec![entry("e1", "2026-01-01", &[("photo", "site.png")])];

    let xlsx = generate(&template, &schema, &entries, dir.path()).unwrap();
    let workbook = read_back(&xlsx);

    // Redirected placements keep the header label visible
    assert_eq!(cell_text(&workbook, 0, 0, 0).unwrap(), "Site photo");

    // The picture is anchored at the body's top-left (row 2 -> index 1)
    let drawing = zip_part(&xlsx, "xl/drawings/drawing1.xml");
    assert!(drawing.contains("<xdr:row>1</xdr:row>"));
    assert!(drawing.contains("<xdr:col>0</xdr:col>"));
    assert!(drawing.contains("<xdr:oneCellAnchor>"));
}

#[test]
fn test_tall_anchor_region_inserts_in_place() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("site.png"), png_bytes(200, 100)).unwrap();

    // Anchor region is 4 rows of 20pt = 80pt, well above the header cutoff
    let template = TemplateBuilder::new("Template")
        .cell("A1", "{{ photo }}")
        .merge("A1:D4")
        .row_height(1, 20.0)
        .row_height(2, 20.0)
        .row_height(3, 20.0)
        .row_height(4, 20.0)
        .build();
    let schema = vec![image_param("photo", "Site photo", (1, 1))];
    let entries = vec![entry("e1", "2026-01-01", &[("photo", "site.png")])];

    let xlsx = generate(&template, &schema, &entries, dir.path()).unwrap();
    let workbook = read_back(&xlsx);

    // Inserted in place: placeholder cleared rather than restored
    let text = cell_text(&workbook, 0, 0, 0).unwrap_or_default();
    assert_eq!(text, "");

    let drawing = zip_part(&xlsx, "xl/drawings/drawing1.xml");
    assert!(drawing.contains("<xdr:row>0</xdr:row>"));
    assert!(drawing.contains("<xdr:col>0</xdr:col>"));
}

#[test]
fn test_missing_image_restores_label_and_keeps_sheet() {
    let dir = tempfile::tempdir().unwrap();

    let template = photo_section_template();
    let schema = vec![image_param("photo", "Site photo", (1, 1))];
    let entries = vec![entry("e1", "2026-01-01", &[("photo", "missing.png")])];

    let xlsx = generate(&template, &schema, &entries, dir.path()).unwrap();
    let workbook = read_back(&xlsx);

    assert_eq!(workbook.sheets.len(), 1);
    assert_eq!(cell_text(&workbook, 0, 0, 0).unwrap(), "Site photo");

    // No drawing parts when nothing was placed
    let parts = zip_part_names(&xlsx);
    assert!(!parts.iter().any(|p| p.starts_with("xl/drawings/")));
    assert!(!parts.iter().any(|p| p.starts_with("xl/media/")));
}

#[test]
fn test_unreadable_image_restores_label() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not an image").unwrap();

    let template = photo_section_template();
    let schema = vec![image_param("photo", "Site photo", (1, 1))];
    let entries = vec![entry("e1", "2026-01-01", &[("photo", "broken.png")])];

    let xlsx = generate(&template, &schema, &entries, dir.path()).unwrap();
    let workbook = read_back(&xlsx);

    assert_eq!(cell_text(&workbook, 0, 0, 0).unwrap(), "Site photo");
}

#[test]
fn test_one_failed_image_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("good.png"), png_bytes(100, 100)).unwrap();

    let template = TemplateBuilder::new("Template")
        .cell("A1", "{{ before }}")
        .merge("A1:D4")
        .cell("A6", "{{ after }}")
        .merge("A6:D9")
        .row_height(1, 20.0)
        .row_height(2, 20.0)
        .row_height(3, 20.0)
        .row_height(4, 20.0)
        .row_height(6, 20.0)
        .row_height(7, 20.0)
        .row_height(8, 20.0)
        .row_height(9, 20.0)
        .build();
    let schema = vec![
        image_param("before", "Before photo", (1, 1)),
        image_param("after", "After photo", (6, 1)),
    ];
    let entries = vec![entry(
        "e1",
        "2026-01-01",
        &[("before", "missing.png"), ("after", "good.png")],
    )];

    let xlsx = generate(&template, &schema, &entries, dir.path()).unwrap();
    let workbook = read_back(&xlsx);

    // The failed image's label comes back, the good one is placed
    assert_eq!(cell_text(&workbook, 0, 0, 0).unwrap(), "Before photo");
    let after_text = cell_text(&workbook, 0, 5, 0).unwrap_or_default();
    assert_eq!(after_text, "");

    let drawing = zip_part(&xlsx, "xl/drawings/drawing1.xml");
    assert!(drawing.contains("<xdr:row>5</xdr:row>"));
}

#[test]
fn test_media_numbering_across_sheets() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("site.png"), png_bytes(200, 100)).unwrap();

    let template = photo_section_template();
    let schema = vec![image_param("photo", "Site photo", (1, 1))];
    let entries = vec![
        entry("e1", "2026-01-01", &[("photo", "site.png")]),
        entry("e2", "2026-01-02", &[("photo", "site.png")]),
    ];

    let xlsx = generate(&template, &schema, &entries, dir.path()).unwrap();

    let parts = zip_part_names(&xlsx);
    assert!(parts.iter().any(|p| p == "xl/drawings/drawing1.xml"));
    assert!(parts.iter().any(|p| p == "xl/drawings/drawing2.xml"));
    assert!(parts.iter().any(|p| p == "xl/media/image1.png"));
    assert!(parts.iter().any(|p| p == "xl/media/image2.png"));

    // Each drawing's rels points at its own media file
    let rels1 = zip_part(&xlsx, "xl/drawings/_rels/drawing1.xml.rels");
    let rels2 = zip_part(&xlsx, "xl/drawings/_rels/drawing2.xml.rels");
    assert!(rels1.contains("../media/image1.png"));
    assert!(rels2.contains("../media/image2.png"));
}
