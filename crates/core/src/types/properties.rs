//! The 13 named product properties stored under `propertiesObj`.

use serde::{Deserialize, Serialize};

/// A single `{key, value}` property pair, as stored in `propertiesObj`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductProperty {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl ProductProperty {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Well-known property keys, in the order the editor writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKey {
    /// Ingredients.
    Contents,
    /// Storage conditions.
    Terms,
    /// Shelf life.
    Expiration,
    /// Nutritional value per 100 g.
    Calories,
    Proteins,
    Fats,
    Carbs,
    /// Processing type (roasted, raw, ...).
    Processing,
    /// Country of origin.
    Country,
    /// Allergen warnings.
    Warnings,
    Packaging,
    /// Product type.
    Type,
    Features,
}

impl PropertyKey {
    /// All keys in storage order.
    pub const ALL: [Self; 13] = [
        Self::Contents,
        Self::Terms,
        Self::Expiration,
        Self::Calories,
        Self::Proteins,
        Self::Fats,
        Self::Carbs,
        Self::Processing,
        Self::Country,
        Self::Warnings,
        Self::Packaging,
        Self::Type,
        Self::Features,
    ];

    /// The key as written into `propertiesObj`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contents => "contents",
            Self::Terms => "terms",
            Self::Expiration => "expiration",
            Self::Calories => "calories",
            Self::Proteins => "proteins",
            Self::Fats => "fats",
            Self::Carbs => "carbs",
            Self::Processing => "processing",
            Self::Country => "country",
            Self::Warnings => "warnings",
            Self::Packaging => "packaging",
            Self::Type => "type",
            Self::Features => "features",
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown property key: {s}"))
    }
}

/// Find the first property with the given key.
#[must_use]
pub fn find_property<'a>(properties: &'a [ProductProperty], key: &str) -> Option<&'a ProductProperty> {
    properties.iter().find(|p| p.key == key)
}

/// Build the canonical 13-entry property list from a lookup source.
///
/// Keys missing from `source` get an empty value.
#[must_use]
pub fn canonical_properties(source: &[ProductProperty]) -> Vec<ProductProperty> {
    PropertyKey::ALL
        .iter()
        .map(|key| {
            let value = find_property(source, key.as_str())
                .map(|p| p.value.clone())
                .unwrap_or_default();
            ProductProperty::new(key.as_str(), value)
        })
        .collect()
}
