//! Structured error types for sheetforge.
//!
//! Only template-load and final-save failures are fatal; per-image and
//! per-entry faults are absorbed inside the assembler and logged.

/// All errors that can surface from template loading, assembly, and saving.
#[derive(Debug, thiserror::Error)]
pub enum SheetforgeError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (schema/entries) error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The template workbook is missing, unreadable, or has no sheets.
    #[error("Template error: {0}")]
    Template(String),

    /// Final workbook serialization failed.
    #[error("Save error: {0}")]
    Save(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetforgeError>;

impl From<String> for SheetforgeError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SheetforgeError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
