//! sheetforge - template-driven XLSX report assembly
//!
//! Takes a styled XLSX template whose cells carry `{{ name }}` placeholder
//! tokens, plus a parameter schema and a batch of dated data entries, and
//! produces one populated sheet per entry in a single output workbook:
//! - Clones the template sheet per entry, preserving styles, merges and sizing
//! - Substitutes text parameters, coercing clean numeric strings to numbers
//! - Places photographs aspect-fit and centered into merged-cell regions,
//!   redirecting from short header rows to the body region below
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let template = std::fs::read("template.xlsx")?;
//! let schema: Vec<sheetforge::ParameterSpec> =
//!     serde_json::from_str(&std::fs::read_to_string("schema.json")?)?;
//! let entries: Vec<sheetforge::Entry> =
//!     serde_json::from_str(&std::fs::read_to_string("entries.json")?)?;
//!
//! let xlsx = sheetforge::generate(&template, &schema, &entries, Path::new("photos"))?;
//! std::fs::write("report.xlsx", xlsx)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Model and input modules
pub mod cell_ref;
pub mod error;
pub mod images;
pub mod schema;
pub mod types;
pub mod units;

// Assembly modules
mod assemble;
pub mod builder;
pub mod geometry;
pub mod layout;
pub mod parser;
pub mod substitute;
pub mod writer;

pub use builder::generate;
pub use error::{Result, SheetforgeError};
pub use schema::{Entry, ParamKind, ParameterSpec};

pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
