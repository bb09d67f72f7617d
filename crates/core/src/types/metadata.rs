//! Generic product metadata and its "additional metadata" editor view.
//!
//! Stored metadata is a flat JSON object. Entries holding a primitive value
//! can be edited one by one; anything nested (objects, arrays) is carried
//! through untouched so a save never loses data the editor cannot show.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::status::EntryState;

/// Flat string-keyed metadata as stored on a product.
pub type MetadataMap = Map<String, Value>;

/// A metadata value the generic editor can represent.
///
/// This is the closed set of primitive kinds. Everything else is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PrimitiveValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl PrimitiveValue {
    /// Classify a stored value, handing opaque values back unchanged.
    ///
    /// # Errors
    ///
    /// Returns the original value if it is an object or an array.
    pub fn classify(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::String(s)),
            opaque @ (Value::Array(_) | Value::Object(_)) => Err(opaque),
        }
    }
}

impl From<PrimitiveValue> for Value {
    fn from(value: PrimitiveValue) -> Self {
        match value {
            PrimitiveValue::Null => Self::Null,
            PrimitiveValue::Bool(b) => Self::Bool(b),
            PrimitiveValue::Number(n) => Self::Number(n),
            PrimitiveValue::String(s) => Self::String(s),
        }
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One row of the additional-metadata editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: PrimitiveValue,
    #[serde(default)]
    pub state: EntryState,
}

impl MetadataEntry {
    /// A row the user added during this session.
    #[must_use]
    pub fn added(key: impl Into<String>, value: impl Into<PrimitiveValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            state: EntryState::Added,
        }
    }
}

/// Editor state for the generic metadata of a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataForm {
    /// Primitive entries the user can edit.
    pub entries: Vec<MetadataEntry>,
    /// Keys the user cleared. Written back as empty strings.
    pub deleted_keys: Vec<String>,
    /// Stored values the editor does not model, kept verbatim.
    pub extra_metadata: MetadataMap,
}

impl MetadataForm {
    /// Split stored metadata into editable entries and opaque values.
    ///
    /// Primitive values under keys not listed in `hidden_keys` become
    /// `existing` entries; everything else lands in `extra_metadata`.
    #[must_use]
    pub fn from_metadata(metadata: Option<&MetadataMap>, hidden_keys: &[&str]) -> Self {
        let mut form = Self::default();

        for (key, value) in metadata.into_iter().flatten() {
            if hidden_keys.contains(&key.as_str()) {
                form.extra_metadata.insert(key.clone(), value.clone());
                continue;
            }
            match PrimitiveValue::classify(value.clone()) {
                Ok(value) => form.entries.push(MetadataEntry {
                    key: key.clone(),
                    value,
                    state: EntryState::Existing,
                }),
                Err(opaque) => {
                    form.extra_metadata.insert(key.clone(), opaque);
                }
            }
        }

        form
    }

    /// Mark a key as cleared, dropping any entry that still holds it.
    pub fn delete_key(&mut self, key: &str) {
        self.entries.retain(|entry| entry.key != key);
        if !self.deleted_keys.iter().any(|k| k == key) {
            self.deleted_keys.push(key.to_string());
        }
    }

    /// Build the metadata patch for this form.
    ///
    /// Entries with an empty key are skipped. Deleted keys become `""`
    /// tombstones, and `extra_metadata` is merged last so untouched opaque
    /// values win.
    #[must_use]
    pub fn to_metadata(&self) -> MetadataMap {
        let mut metadata: MetadataMap = self
            .entries
            .iter()
            .filter(|entry| !entry.key.is_empty())
            .map(|entry| (entry.key.clone(), Value::from(entry.value.clone())))
            .collect();

        for key in &self.deleted_keys {
            metadata.insert(key.clone(), Value::String(String::new()));
        }

        for (key, value) in &self.extra_metadata {
            metadata.insert(key.clone(), value.clone());
        }

        metadata
    }
}
