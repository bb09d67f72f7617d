//! Metadata codec for extended product attributes.
//!
//! Extended attributes live inside a product's flat metadata object:
//!
//! | Key             | Stored as                                         |
//! |-----------------|---------------------------------------------------|
//! | `propertiesObj` | JSON string of a `[{"key": .., "value": ..}]` array |
//! | `videoUrls`     | video links joined with a literal `\|`             |
//! | `visitsCount`   | integer                                           |
//!
//! Every other key is either an editable primitive entry or an opaque value
//! that is carried through verbatim.
//!
//! Decoding is total: malformed values degrade to defaults and never produce
//! an error. The `|` separator is not escaped, so a link containing `|` comes
//! back split in two.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::metadata::{MetadataForm, MetadataMap};
use crate::types::properties::{ProductProperty, PropertyKey, canonical_properties, find_property};

/// Metadata key holding the JSON-encoded property list.
pub const PROPERTIES_KEY: &str = "propertiesObj";
/// Metadata key holding the `|`-joined video links.
pub const VIDEO_URLS_KEY: &str = "videoUrls";
/// Metadata key holding the visit counter.
pub const VISITS_COUNT_KEY: &str = "visitsCount";
/// Separator between video links in `videoUrls`.
pub const VIDEO_SEPARATOR: &str = "|";

/// Keys hidden from the generic metadata editor.
pub const DEFAULT_HIDDEN_KEYS: &[&str] = &[PROPERTIES_KEY, VIDEO_URLS_KEY, VISITS_COUNT_KEY];

/// The structured, editable view of a product's extended fields.
///
/// A submitted form replaces every extended field, so all fields are
/// required when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedAttributes {
    /// Markdown body, taken from the product's own description.
    pub description: String,
    /// The 13 named properties in canonical order.
    pub properties: Vec<ProductProperty>,
    /// Stored as `visitsCount`.
    pub visit_count: u64,
    /// Stored `|`-joined as `videoUrls`.
    pub video_links: Vec<String>,
    /// Generic metadata not covered by the fields above.
    pub metadata: MetadataForm,
}

fn empty_properties() -> Vec<ProductProperty> {
    canonical_properties(&[])
}

impl Default for ExtendedAttributes {
    fn default() -> Self {
        Self {
            description: String::new(),
            properties: empty_properties(),
            visit_count: 0,
            video_links: Vec::new(),
            metadata: MetadataForm::default(),
        }
    }
}

impl ExtendedAttributes {
    /// Value of a named property, or `""` if it is not set.
    #[must_use]
    pub fn property(&self, key: PropertyKey) -> &str {
        find_property(&self.properties, key.as_str()).map_or("", |p| p.value.as_str())
    }

    /// Set a named property, appending it if the list lacks the key.
    pub fn set_property(&mut self, key: PropertyKey, value: impl Into<String>) {
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.key == key.as_str()) {
            Some(property) => property.value = value,
            None => self.properties.push(ProductProperty::new(key.as_str(), value)),
        }
    }
}

/// Decode stored metadata into extended attributes.
///
/// `description` comes from the product record itself. `hidden_keys` are
/// excluded from the generic entry list (they still survive in
/// `extra_metadata`).
#[must_use]
pub fn decode(
    description: Option<&str>,
    metadata: Option<&MetadataMap>,
    hidden_keys: &[&str],
) -> ExtendedAttributes {
    let stored = metadata.and_then(|m| m.get(PROPERTIES_KEY));

    ExtendedAttributes {
        description: description.unwrap_or_default().to_string(),
        properties: canonical_properties(&parse_properties(stored)),
        visit_count: parse_visits(metadata.and_then(|m| m.get(VISITS_COUNT_KEY))),
        video_links: split_video_links(metadata.and_then(|m| m.get(VIDEO_URLS_KEY))),
        metadata: MetadataForm::from_metadata(metadata, hidden_keys),
    }
}

/// Encode extended attributes into a metadata patch.
///
/// The description is not part of the patch; it travels in the product's own
/// field.
#[must_use]
pub fn encode(attributes: &ExtendedAttributes) -> MetadataMap {
    let mut metadata = attributes.metadata.to_metadata();

    metadata.insert(
        PROPERTIES_KEY.to_string(),
        Value::String(properties_json(&attributes.properties)),
    );
    metadata.insert(
        VIDEO_URLS_KEY.to_string(),
        Value::String(join_video_links(&attributes.video_links)),
    );
    metadata.insert(
        VISITS_COUNT_KEY.to_string(),
        Value::from(attributes.visit_count),
    );

    metadata
}

/// Serialize properties as the `[{"key", "value"}]` JSON text.
fn properties_json(properties: &[ProductProperty]) -> String {
    Value::Array(
        properties
            .iter()
            .map(|p| json!({ "key": p.key, "value": p.value }))
            .collect(),
    )
    .to_string()
}

/// Join video links with the unescaped separator.
#[must_use]
pub fn join_video_links(links: &[String]) -> String {
    links.join(VIDEO_SEPARATOR)
}

/// Parse the stored property list.
///
/// Accepts a JSON string (the normal form) or an already-decoded array.
/// Elements without a string `key` are skipped; non-string values are
/// rendered as text, `null` as empty.
fn parse_properties(stored: Option<&Value>) -> Vec<ProductProperty> {
    let items = match stored {
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::debug!("propertiesObj is not an array, using empty properties");
                return Vec::new();
            }
            Err(e) => {
                tracing::debug!(error = %e, "propertiesObj is not valid JSON, using empty properties");
                return Vec::new();
            }
        },
        Some(Value::Array(items)) => items.clone(),
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| {
            let key = item.get("key")?.as_str()?;
            let value = match item.get("value") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            Some(ProductProperty::new(key, value))
        })
        .collect()
}

/// Read the visit counter, treating anything unusable as zero.
fn parse_visits(stored: Option<&Value>) -> u64 {
    match stored {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    // Saturating float-to-int conversion.
                    .map(|f| {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let visits = f as u64;
                        visits
                    })
            })
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Split stored video links. An empty or missing value means no links.
fn split_video_links(stored: Option<&Value>) -> Vec<String> {
    match stored {
        Some(Value::String(s)) if !s.is_empty() => {
            s.split(VIDEO_SEPARATOR).map(str::to_string).collect()
        }
        _ => Vec::new(),
    }
}
