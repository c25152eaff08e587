//! Image resource resolution and header probing.
//!
//! The engine never decodes pixels; it only needs the raw bytes (written to
//! the output package untouched) and the native pixel size (for aspect-fit
//! planning), which is read straight from the file header.

use std::path::{Path, PathBuf};

use crate::error::{Result, SheetforgeError};
use crate::types::ImageFormat;

/// An image ready for placement: raw bytes plus probed metadata.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
}

/// Resolves stored image references against a managed storage root.
///
/// A reference resolves as an existing absolute path first; otherwise its
/// base filename is looked up inside the root.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageStore { root: root.into() }
    }

    /// Resolve a stored reference to an existing path, if possible.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let as_path = Path::new(reference);
        if as_path.is_absolute() && as_path.exists() {
            return Some(as_path.to_path_buf());
        }

        let candidate = self.root.join(as_path.file_name()?);
        candidate.exists().then_some(candidate)
    }

    /// Resolve, read, and probe an image reference.
    ///
    /// Fails (recoverably, from the caller's point of view) when the
    /// reference resolves nowhere or the header cannot be read.
    pub fn load(&self, reference: &str) -> Result<LoadedImage> {
        let path = self
            .resolve(reference)
            .ok_or_else(|| SheetforgeError::Other(format!("image not found: {reference}")))?;

        let data = std::fs::read(&path)?;
        let format = ImageFormat::from_magic_bytes(&data);
        let (width, height) = probe_dimensions(&data, format).ok_or_else(|| {
            SheetforgeError::Other(format!("unreadable image header: {}", path.display()))
        })?;

        Ok(LoadedImage {
            data,
            format,
            width,
            height,
        })
    }
}

/// Read native pixel dimensions from an image file header.
#[must_use]
pub fn probe_dimensions(data: &[u8], format: ImageFormat) -> Option<(u32, u32)> {
    match format {
        ImageFormat::Png => png_dimensions(data),
        ImageFormat::Jpeg => jpeg_dimensions(data),
        ImageFormat::Gif => gif_dimensions(data),
        ImageFormat::Bmp => bmp_dimensions(data),
        ImageFormat::Unknown => None,
    }
}

fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes(bytes.try_into().ok()?))
}

fn read_u16_be(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes(bytes.try_into().ok()?))
}

fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes(bytes.try_into().ok()?))
}

fn read_i32_le(data: &[u8], offset: usize) -> Option<i32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(i32::from_le_bytes(bytes.try_into().ok()?))
}

/// PNG: width/height live in the IHDR chunk at fixed offsets 16 and 20.
fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.get(12..16) != Some(b"IHDR") {
        return None;
    }
    let w = read_u32_be(data, 16)?;
    let h = read_u32_be(data, 20)?;
    (w > 0 && h > 0).then_some((w, h))
}

/// JPEG: walk the marker segments until a start-of-frame marker carries the
/// frame dimensions.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2; // skip SOI
    loop {
        if *data.get(pos)? != 0xFF {
            return None;
        }
        let marker = *data.get(pos + 1)?;

        // Standalone markers without a length field
        if (0xD0..=0xD9).contains(&marker) || marker == 0x01 {
            pos += 2;
            continue;
        }

        // SOF0..SOF15 except DHT (C4), JPG (C8), DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let h = read_u16_be(data, pos + 5)?;
            let w = read_u16_be(data, pos + 7)?;
            return (w > 0 && h > 0).then_some((u32::from(w), u32::from(h)));
        }

        let len = read_u16_be(data, pos + 2)?;
        if len < 2 {
            return None;
        }
        pos += 2 + usize::from(len);
    }
}

/// GIF: logical screen descriptor right after the 6-byte signature.
fn gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let w = read_u16_le(data, 6)?;
    let h = read_u16_le(data, 8)?;
    (w > 0 && h > 0).then_some((u32::from(w), u32::from(h)))
}

/// BMP: signed width/height in the BITMAPINFOHEADER (height may be negative
/// for top-down bitmaps).
fn bmp_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let w = read_i32_le(data, 18)?;
    let h = read_i32_le(data, 22)?.unsigned_abs();
    let w = u32::try_from(w).ok()?;
    (w > 0 && h > 0).then_some((w, h))
}
