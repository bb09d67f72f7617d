//! Product records as held by the product store.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};
use super::metadata::MetadataMap;
use super::properties::ProductProperty;
use super::status::Availability;
use crate::codec::{self, DEFAULT_HIDDEN_KEYS};

/// A sellable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default)]
    pub title: String,
    /// Stock on hand across all locations.
    #[serde(default)]
    pub inventory_quantity: i64,
}

/// A product with its generic metadata field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<MetadataMap>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Derive availability from the variants' stock.
    #[must_use]
    pub fn availability(&self) -> Availability {
        Availability::from_stock(self.variants.iter().map(|v| v.inventory_quantity))
    }
}

/// Partial update for a product.
///
/// `metadata` is a patch: the store merges it into the existing object
/// rather than replacing it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataMap>,
}

/// A product decorated with its decoded extended fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub videos: Vec<String>,
    pub properties: Vec<ProductProperty>,
    pub visits: u64,
    pub state: Availability,
}

impl From<Product> for ExtendedProduct {
    fn from(product: Product) -> Self {
        let attributes = codec::decode(
            product.description.as_deref(),
            product.metadata.as_ref(),
            DEFAULT_HIDDEN_KEYS,
        );
        let state = product.availability();

        Self {
            product,
            videos: attributes.video_links,
            properties: attributes.properties,
            visits: attributes.visit_count,
            state,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(metadata: serde_json::Value, stock: &[i64]) -> Product {
        Product {
            id: ProductId::parse("prod_01").unwrap(),
            title: "Pistachio".to_string(),
            description: Some("Roasted".to_string()),
            metadata: metadata.as_object().cloned(),
            variants: stock
                .iter()
                .enumerate()
                .map(|(i, q)| ProductVariant {
                    id: VariantId::parse(format!("variant_{i}")).unwrap(),
                    title: format!("{i}00 g"),
                    inventory_quantity: *q,
                })
                .collect(),
        }
    }

    #[test]
    fn test_extended_product_decorates_fields() {
        let p = product(
            json!({
                "propertiesObj": r#"[{"key":"contents","value":"nuts"}]"#,
                "videoUrls": "https://youtu.be/a|https://youtu.be/b",
                "visitsCount": 7,
            }),
            &[0, 4],
        );

        let extended = ExtendedProduct::from(p);

        assert_eq!(extended.videos, vec!["https://youtu.be/a", "https://youtu.be/b"]);
        assert_eq!(extended.visits, 7);
        assert_eq!(extended.properties.len(), 13);
        assert_eq!(extended.properties[0].value, "nuts");
        assert_eq!(extended.state, Availability::Available);
    }

    #[test]
    fn test_extended_product_tolerates_missing_metadata() {
        let extended = ExtendedProduct::from(product(json!(null), &[0]));

        assert!(extended.videos.is_empty());
        assert_eq!(extended.visits, 0);
        assert!(extended.properties.iter().all(|p| p.value.is_empty()));
        assert_eq!(extended.state, Availability::Unavailable);
    }

    #[test]
    fn test_extended_product_serializes_flat() {
        let value = serde_json::to_value(ExtendedProduct::from(product(json!({}), &[1]))).unwrap();

        assert_eq!(value["id"], json!("prod_01"));
        assert_eq!(value["title"], json!("Pistachio"));
        assert_eq!(value["state"], json!("available"));
        assert_eq!(value["visits"], json!(0));
    }

    #[test]
    fn test_product_update_skips_absent_fields() {
        let update = ProductUpdate {
            description: Some("x".to_string()),
            metadata: None,
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"description": "x"}));
        assert_eq!(serde_json::to_value(ProductUpdate::default()).unwrap(), json!({}));
    }
}
