//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::services::{BaseUpdateValidator, ExtendedProductService, ExtendedUpdateValidator};
use crate::store::ProductBackend;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the product store, the listing cache and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    products: ExtendedProductService<ProductBackend>,
    validator: ExtendedUpdateValidator<BaseUpdateValidator>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Admin configuration
    /// * `backend` - Product store selected at start-up
    #[must_use]
    pub fn new(config: AdminConfig, backend: ProductBackend) -> Self {
        let products = ExtendedProductService::new(backend, config.list_cache_ttl);
        let validator = ExtendedUpdateValidator::new(BaseUpdateValidator, config.validation_enforced);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                validator,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the extended product listing service.
    #[must_use]
    pub fn products(&self) -> &ExtendedProductService<ProductBackend> {
        &self.inner.products
    }

    /// Get the underlying product store.
    #[must_use]
    pub fn store(&self) -> &ProductBackend {
        self.inner.products.store()
    }

    /// Get the update validator.
    #[must_use]
    pub fn validator(&self) -> &ExtendedUpdateValidator<BaseUpdateValidator> {
        &self.inner.validator
    }
}
