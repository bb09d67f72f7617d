//! In-memory product store.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use extended_products_core::{Product, ProductId, ProductUpdate};

use super::{ProductQuery, ProductStore};
use crate::db::RepositoryError;

/// Product store backed by a shared ordered map.
///
/// Cloning is cheap and every clone sees the same products.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with products.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    /// Insert or replace a product.
    pub async fn upsert(&self, product: Product) {
        self.products.write().await.insert(product.id.clone(), product);
    }
}

impl ProductStore for InMemoryProductStore {
    async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.products
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;
        let product = products.get_mut(id).ok_or(RepositoryError::NotFound)?;

        if let Some(description) = update.description {
            product.description = Some(description);
        }
        if let Some(patch) = update.metadata {
            debug!(product_id = %id, keys = patch.len(), "Merging metadata patch");
            product.metadata.get_or_insert_default().extend(patch);
        }

        Ok(product.clone())
    }

    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| query.matches_title(&p.title))
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, query: &ProductQuery) -> Result<u64, RepositoryError> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| query.matches_title(&p.title))
            .count() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(id: &str, title: &str, metadata: serde_json::Value) -> Product {
        Product {
            id: ProductId::parse(id).unwrap(),
            title: title.to_string(),
            description: None,
            metadata: metadata.as_object().cloned(),
            variants: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let store = InMemoryProductStore::new();
        let err = store
            .get_by_id(&ProductId::parse("prod_x").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_merges_metadata_and_keeps_other_keys() {
        let store = InMemoryProductStore::with_products([product(
            "prod_1",
            "Pistachio",
            json!({"brand": "Acme", "visitsCount": 1}),
        )]);
        let id = ProductId::parse("prod_1").unwrap();

        let updated = store
            .update(
                &id,
                ProductUpdate {
                    description: Some("Roasted".to_string()),
                    metadata: json!({"visitsCount": 2}).as_object().cloned(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("Roasted"));
        let metadata = updated.metadata.unwrap();
        assert_eq!(metadata["brand"], json!("Acme"));
        assert_eq!(metadata["visitsCount"], json!(2));
    }

    #[tokio::test]
    async fn test_update_creates_metadata_when_absent() {
        let store = InMemoryProductStore::with_products([product("prod_1", "Walnut", json!(null))]);
        let id = ProductId::parse("prod_1").unwrap();

        let updated = store
            .update(
                &id,
                ProductUpdate {
                    description: None,
                    metadata: json!({"videoUrls": ""}).as_object().cloned(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.metadata.unwrap()["videoUrls"], json!(""));
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let store = InMemoryProductStore::with_products([
            product("prod_1", "Pistachio roasted", json!({})),
            product("prod_2", "Walnut", json!({})),
            product("prod_3", "Pistachio raw", json!({})),
        ]);
        let query = ProductQuery {
            q: Some("pistachio".to_string()),
            offset: 1,
            limit: 5,
        };

        let page = store.list(&query).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id.as_str(), "prod_3");
        assert_eq!(store.count(&query).await.unwrap(), 2);
    }
}
