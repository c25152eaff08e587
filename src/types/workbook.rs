use serde::{Deserialize, Serialize};

use super::Sheet;

/// A complete workbook: the sheets plus the template parts carried through
/// verbatim so generated output keeps the template's look.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Raw bytes of the template's `xl/styles.xml`, passed through on save.
    #[serde(skip)]
    pub styles_xml: Option<Vec<u8>>,
    /// Raw bytes of the template's `xl/theme/theme1.xml`, passed through on save.
    #[serde(skip)]
    pub theme_xml: Option<Vec<u8>>,
}

impl Workbook {
    /// Position of the sheet with the given name.
    #[must_use]
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    /// Whether any sheet already uses the given name.
    #[must_use]
    pub fn has_sheet_name(&self, name: &str) -> bool {
        self.sheet_index(name).is_some()
    }
}
