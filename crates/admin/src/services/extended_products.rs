//! Extended product listing.
//!
//! Wraps a [`ProductStore`] and decorates every product with its decoded
//! extended fields (`videos`, `properties`, `visits`) and an availability
//! `state`. Listing pages are cached with `moka`; any successful edit must
//! call [`CacheInvalidator::invalidate_lists`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, instrument};

use extended_products_core::{ExtendedProduct, ProductId};

use crate::db::RepositoryError;
use crate::store::{ProductQuery, ProductStore};

const LIST_CACHE_CAPACITY: u64 = 1000;

/// Drops cached product listings after a mutation.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate_lists(&self);
}

/// A page of extended products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedProductPage {
    pub products: Vec<ExtendedProduct>,
    /// Total matching products, ignoring pagination.
    pub count: u64,
    pub offset: u32,
    pub limit: u32,
}

/// Listing service for extended products.
#[derive(Clone)]
pub struct ExtendedProductService<S> {
    store: S,
    lists: Cache<ProductQuery, ExtendedProductPage>,
    /// Bumped on every invalidation. A page read across a bump is not cached.
    generation: Arc<AtomicU64>,
}

impl<S: ProductStore> ExtendedProductService<S> {
    /// Create a new service with the given listing cache lifetime.
    #[must_use]
    pub fn new(store: S, list_ttl: Duration) -> Self {
        let lists = Cache::builder()
            .max_capacity(LIST_CACHE_CAPACITY)
            .time_to_live(list_ttl)
            .build();

        Self {
            store,
            lists,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The wrapped product store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// List products decorated with their extended fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot list or count products.
    #[instrument(skip(self))]
    pub async fn list_extended(
        &self,
        query: ProductQuery,
    ) -> Result<ExtendedProductPage, RepositoryError> {
        let query = query.normalized();

        if let Some(page) = self.lists.get(&query).await {
            debug!("Cache hit for product listing");
            return Ok(page);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let products = self.store.list(&query).await?;
        let count = self.store.count(&query).await?;

        let page = ExtendedProductPage {
            products: products.into_iter().map(ExtendedProduct::from).collect(),
            count,
            offset: query.offset,
            limit: query.limit,
        };

        self.lists.insert(query.clone(), page.clone()).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Product listing invalidated while loading, not caching");
            self.lists.invalidate(&query).await;
        }

        Ok(page)
    }

    /// Fetch a single product decorated with its extended fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn retrieve_extended(&self, id: &ProductId) -> Result<ExtendedProduct, RepositoryError> {
        let product = self.store.get_by_id(id).await?;
        Ok(ExtendedProduct::from(product))
    }
}

impl<S: Send + Sync> CacheInvalidator for ExtendedProductService<S> {
    fn invalidate_lists(&self) {
        debug!("Invalidating product listing cache");
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.lists.invalidate_all();
    }
}
