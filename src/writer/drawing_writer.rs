//! Generates DrawingML parts for placed pictures.
//!
//! Each picture becomes a `oneCellAnchor`: the anchor cell plus EMU offsets
//! carry the centering decision, and the explicit extent carries the
//! aspect-fit size.

use crate::error::Result;
use crate::types::Picture;

use super::xml_escape;

const NS_SPREADSHEET_DRAWING: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Write a drawing part holding all pictures of one sheet.
///
/// Picture `i` references relationship `rId{i+1}` in the drawing's rels.
pub(crate) fn write_drawing_xml(pictures: &[Picture]) -> Result<String> {
    let mut out = String::with_capacity(1024);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<xdr:wsDr xmlns:xdr="{NS_SPREADSHEET_DRAWING}" xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}">"#
    ));
    out.push('\n');

    for (idx, pic) in pictures.iter().enumerate() {
        let anchor = &pic.anchor;
        out.push_str("<xdr:oneCellAnchor>\n");
        out.push_str(&format!(
            "<xdr:from><xdr:col>{}</xdr:col><xdr:colOff>{}</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>{}</xdr:rowOff></xdr:from>\n",
            anchor.col, anchor.col_off, anchor.row, anchor.row_off
        ));
        out.push_str(&format!(
            "<xdr:ext cx=\"{}\" cy=\"{}\"/>\n",
            anchor.extent_cx, anchor.extent_cy
        ));

        out.push_str("<xdr:pic>\n");
        out.push_str(&format!(
            "<xdr:nvPicPr><xdr:cNvPr id=\"{}\" name=\"{}\"/><xdr:cNvPicPr/></xdr:nvPicPr>\n",
            idx + 1,
            xml_escape(&pic.name)
        ));
        out.push_str(&format!(
            "<xdr:blipFill><a:blip r:embed=\"rId{}\"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>\n",
            idx + 1
        ));
        out.push_str(&format!(
            "<xdr:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm><a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></xdr:spPr>\n",
            anchor.extent_cx, anchor.extent_cy
        ));
        out.push_str("</xdr:pic>\n");
        out.push_str("<xdr:clientData/>\n");
        out.push_str("</xdr:oneCellAnchor>\n");
    }

    out.push_str("</xdr:wsDr>");
    Ok(out)
}
