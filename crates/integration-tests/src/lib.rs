//! Integration tests for extended products.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p extended-products-integration-tests
//! ```
//!
//! The tests drive the admin router in-process with `tower::ServiceExt::oneshot`
//! against the in-memory product store, so no database or running server is
//! needed.
//!
//! # Test Categories
//!
//! - `admin_extended_form` - Load and submit the extended product form
//! - `store_listing` - Extended product listing and cache invalidation
//! - `health` - Liveness and readiness

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use extended_products_admin::config::AdminConfig;
use extended_products_admin::routes;
use extended_products_admin::state::AppState;
use extended_products_admin::store::{InMemoryProductStore, ProductBackend};
use extended_products_core::Product;

/// An in-process admin app over an in-memory store.
pub struct TestContext {
    pub app: Router,
    pub store: InMemoryProductStore,
}

impl TestContext {
    /// Build an app seeded with the default fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AdminConfig::default(), fixtures())
    }

    /// Build an app with extended validation switched on.
    #[must_use]
    pub fn enforced() -> Self {
        let config = AdminConfig {
            validation_enforced: true,
            ..AdminConfig::default()
        };
        Self::with_config(config, fixtures())
    }

    #[must_use]
    pub fn with_config(mut config: AdminConfig, products: Vec<Product>) -> Self {
        config.list_cache_ttl = Duration::from_secs(60);
        let store = InMemoryProductStore::with_products(products);
        let state = AppState::new(config, ProductBackend::Memory(store.clone()));

        Self {
            app: routes::app(state),
            store,
        }
    }

    /// Send a GET request and return the status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is unreadable.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Send a JSON POST request and return the status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is unreadable.
    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Default products: one in stock with extended fields, one sold out and bare.
///
/// # Panics
///
/// Panics if the fixture JSON does not match the product shape.
#[must_use]
pub fn fixtures() -> Vec<Product> {
    serde_json::from_value(json!([
        {
            "id": "prod_pistachio",
            "title": "Roasted pistachio",
            "description": "Salted, in shell",
            "metadata": {
                "brand": "Orchard Co",
                "propertiesObj": "[{\"key\":\"country\",\"value\":\"USA\"}]",
                "videoUrls": "https://youtu.be/a|https://youtu.be/b",
                "visitsCount": 12,
                "shipping": {"fragile": false}
            },
            "variants": [
                {"id": "var_pistachio_250", "title": "250 g", "inventory_quantity": 40}
            ]
        },
        {
            "id": "prod_walnut",
            "title": "Walnut halves",
            "variants": [
                {"id": "var_walnut_500", "title": "500 g", "inventory_quantity": 0}
            ]
        }
    ]))
    .expect("Fixture products are valid")
}
