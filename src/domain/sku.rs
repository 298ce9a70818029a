//! SKU and image models
//!
//! The catalog returns loosely-typed JSON objects. [`SkuDetail`] extracts only
//! the fields the updater needs, while [`SkuImage`] keeps the whole original
//! object because the image update endpoint is a full-object replace.

use super::ids::{FileId, SkuId};
use serde_json::{Map, Value};

/// Fields of a SKU that drive label generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuDetail {
    /// SKU identifier
    pub id: SkuId,

    /// Display name, the first non-blank of `ProductName`, `NameComplete`, `Name`
    pub name: Option<String>,

    /// External reference code (`RefId`)
    pub ref_id: Option<String>,
}

impl SkuDetail {
    /// Extract the detail fields from a catalog SKU object
    pub fn from_json(id: SkuId, value: &Value) -> Self {
        let name = ["ProductName", "NameComplete", "Name"]
            .iter()
            .filter_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string);

        let ref_id = match value.get("RefId") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Self { id, name, ref_id }
    }
}

/// An image attached to a SKU, with its original payload retained verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct SkuImage {
    payload: Map<String, Value>,
}

impl SkuImage {
    /// Wrap a catalog image object
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(payload) => Ok(Self { payload }),
            other => Err(format!("Expected image object, got: {other}")),
        }
    }

    /// The image file identifier (`Id`)
    pub fn file_id(&self) -> Option<FileId> {
        self.payload
            .get("Id")
            .and_then(Value::as_u64)
            .map(FileId::new)
    }

    /// The current label (alt text), if any
    pub fn label(&self) -> Option<&str> {
        self.payload.get("Label").and_then(Value::as_str)
    }

    /// Whether the image carries a non-blank label
    pub fn has_label(&self) -> bool {
        self.label().map(|l| !l.trim().is_empty()).unwrap_or(false)
    }

    /// Build the full replacement payload with only the label fields changed
    pub fn relabeled(&self, label: &str) -> Value {
        let mut payload = self.payload.clone();
        payload.insert("Label".to_string(), Value::String(label.to_string()));
        payload.insert("Text".to_string(), Value::String(label.to_string()));
        Value::Object(payload)
    }

    /// The original payload
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}
