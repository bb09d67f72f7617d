//! Product store abstraction.
//!
//! The admin never owns product records; it reads and patches them through a
//! [`ProductStore`]. Two backends exist:
//!
//! - [`PgProductStore`] - `PostgreSQL` (`products.metadata` JSONB)
//! - [`InMemoryProductStore`] - process-local map, used without a database
//!   and in tests
//!
//! [`ProductBackend`] picks one at start-up so handlers stay non-generic.

pub mod memory;

use std::future::Future;

use serde::Deserialize;

use extended_products_core::{Product, ProductId, ProductUpdate};

use crate::db::{PgProductStore, RepositoryError};

pub use memory::InMemoryProductStore;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Listing selector: free-text title filter plus offset pagination.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    /// Case-insensitive substring match on the title.
    pub q: Option<String>,
    pub offset: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            q: None,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// Clamp the page size and drop blank search terms.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        self.q = self
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        self
    }

    /// Whether a title matches the search term.
    #[must_use]
    pub fn matches_title(&self, title: &str) -> bool {
        self.q
            .as_ref()
            .is_none_or(|q| title.to_lowercase().contains(&q.to_lowercase()))
    }
}

/// Read and patch access to product records.
pub trait ProductStore: Send + Sync {
    /// Fetch a single product with its variants.
    fn get_by_id(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// Apply a partial update and return the stored result.
    ///
    /// `update.metadata` is merged key by key into the stored metadata; keys
    /// absent from the patch are left untouched.
    fn update(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// List a page of products, ordered by ID.
    fn list(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Count all products matching the query, ignoring pagination.
    fn count(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;
}

impl<S: ProductStore> ProductStore for &S {
    fn get_by_id(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        (**self).get_by_id(id)
    }

    fn update(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        (**self).update(id, update)
    }

    fn list(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send {
        (**self).list(query)
    }

    fn count(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send {
        (**self).count(query)
    }
}

/// The store selected at start-up.
#[derive(Clone)]
pub enum ProductBackend {
    Postgres(PgProductStore),
    Memory(InMemoryProductStore),
}

impl ProductBackend {
    /// Verify the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database does not answer.
    pub async fn health_check(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(store) => store.health_check().await,
            Self::Memory(_) => Ok(()),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl ProductStore for ProductBackend {
    async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        match self {
            Self::Postgres(store) => store.get_by_id(id).await,
            Self::Memory(store) => store.get_by_id(id).await,
        }
    }

    async fn update(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, RepositoryError> {
        match self {
            Self::Postgres(store) => store.update(id, update).await,
            Self::Memory(store) => store.update(id, update).await,
        }
    }

    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        match self {
            Self::Postgres(store) => store.list(query).await,
            Self::Memory(store) => store.list(query).await,
        }
    }

    async fn count(&self, query: &ProductQuery) -> Result<u64, RepositoryError> {
        match self {
            Self::Postgres(store) => store.count(query).await,
            Self::Memory(store) => store.count(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_normalized_clamps_and_trims() {
        let query = ProductQuery {
            q: Some("   ".to_string()),
            offset: 5,
            limit: 1000,
        }
        .normalized();

        assert_eq!(query.q, None);
        assert_eq!(query.offset, 5);
        assert_eq!(query.limit, MAX_PAGE_SIZE);
        assert_eq!(ProductQuery { limit: 0, ..ProductQuery::default() }.normalized().limit, 1);
    }

    #[test]
    fn test_query_matches_title_case_insensitive() {
        let query = ProductQuery {
            q: Some("PISTA".to_string()),
            ..ProductQuery::default()
        };
        assert!(query.matches_title("Roasted pistachio"));
        assert!(!query.matches_title("Walnut"));
        assert!(ProductQuery::default().matches_title("anything"));
    }
}
