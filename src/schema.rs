//! Parameter schema and data entries consumed by the engine.
//!
//! Both are produced by external collaborators (template inference, entry
//! capture); the engine only reads them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::substitute::placeholder_token;

/// Kind of a template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    Text,
    Image,
}

/// One template variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    /// Unique within a schema; derives the placeholder token `{{ name }}`.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    /// The literal text the token replaced during template creation; used
    /// as restoration text when an image is redirected or not inserted.
    #[serde(default)]
    pub original_text: String,
    /// Image parameters only: 1-indexed (row, column) where the image's
    /// top-left should start if no redirection occurs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_cell: Option<(u32, u32)>,
}

impl ParameterSpec {
    /// The placeholder token this parameter marks in template cells.
    #[must_use]
    pub fn token(&self) -> String {
        placeholder_token(&self.name)
    }
}

/// One reporting-period entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    /// ISO date string; entries are sorted ascending by this field before
    /// assembly (string comparison is sufficient for the ISO format).
    pub date: String,
    /// Parameter name to value. A missing key, null, or empty string all
    /// mean "not supplied" — never an error.
    #[serde(default)]
    pub data: HashMap<String, Option<String>>,
}

impl Entry {
    /// The supplied value for a parameter, treating missing/null/empty as
    /// not supplied.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.data
            .get(name)
            .and_then(Option::as_deref)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token() {
        let spec = ParameterSpec {
            name: "removal_photo".into(),
            kind: ParamKind::Image,
            original_text: "Photo".into(),
            anchor_cell: Some((3, 1)),
        };
        assert_eq!(spec.token(), "{{ removal_photo }}");
    }

    #[test]
    fn test_entry_value_treats_empty_as_missing() {
        let mut data = HashMap::new();
        data.insert("a".to_string(), Some("x".to_string()));
        data.insert("b".to_string(), Some(String::new()));
        data.insert("c".to_string(), None);
        let entry = Entry {
            id: "1".into(),
            date: "2026-01-05".into(),
            data,
        };
        assert_eq!(entry.value("a"), Some("x"));
        assert_eq!(entry.value("b"), None);
        assert_eq!(entry.value("c"), None);
        assert_eq!(entry.value("d"), None);
    }

    #[test]
    fn test_schema_json_round_trip() {
        let json = r#"{
            "name": "site_photo",
            "type": "image",
            "originalText": "Site photograph",
            "anchorCell": [5, 2]
        }"#;
        let spec: ParameterSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.kind, ParamKind::Image);
        assert_eq!(spec.anchor_cell, Some((5, 2)));
    }

    #[test]
    fn test_entry_json_with_nulls() {
        let json = r#"{
            "id": "e1",
            "date": "2026-02-01",
            "data": { "note": "done", "photo": null }
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.value("note"), Some("done"));
        assert_eq!(entry.value("photo"), None);
    }
}
