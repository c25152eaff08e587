use serde::{Deserialize, Serialize};

/// An image placed on a sheet, waiting to be serialized as a DrawingML part.
///
/// Produced by the assembler from a layout decision; the writer turns each
/// one into a `oneCellAnchor` picture plus a media file.
#[derive(Debug, Clone)]
pub struct Picture {
    /// Raw image bytes, written to `xl/media/` untouched.
    pub data: Vec<u8>,
    /// Detected image format (drives the media extension and content type).
    pub format: ImageFormat,
    /// Where and how large the picture lands.
    pub anchor: PictureAnchor,
    /// Human-readable name, shown by spreadsheet UIs.
    pub name: String,
}

/// A `oneCellAnchor`: top-left cell, sub-cell EMU offsets, explicit extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureAnchor {
    /// Anchor column (0-indexed).
    pub col: u32,
    /// Anchor row (0-indexed).
    pub row: u32,
    /// Column offset in EMU.
    pub col_off: i64,
    /// Row offset in EMU.
    pub row_off: i64,
    /// Width in EMU.
    pub extent_cx: i64,
    /// Height in EMU.
    pub extent_cy: i64,
}

/// Image format detection for the formats the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Unknown,
}

impl ImageFormat {
    /// Detect image format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Self::Bmp;
        }

        Self::Unknown
    }

    /// File extension used for the media part.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Unknown => "bin",
        }
    }

    /// Content type registered in `[Content_Types].xml`.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Unknown => "application/octet-stream",
        }
    }
}
