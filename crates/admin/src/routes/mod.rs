//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (product store)
//!
//! # Extended product form (admin)
//! GET  /admin/products/{id}/extended    - Decoded form values
//! POST /admin/products/{id}/extended    - Submit edited form values
//!
//! # Extended product listing (store)
//! GET  /store/products                  - Paged listing (?q=&offset=&limit=)
//! GET  /store/products/{id}             - Single extended product
//! ```

pub mod products;
pub mod store;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Create the health routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/ready", get(readiness))
}

/// Create the admin product routes router.
pub fn admin_product_routes() -> Router<AppState> {
    Router::new().route(
        "/{id}/extended",
        get(products::show_extended).post(products::update_extended),
    )
}

/// Create the store product routes router.
pub fn store_product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(store::list))
        .route("/{id}", get(store::show))
}

/// Create all routes for the admin service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/admin/products", admin_product_routes())
        .nest("/store/products", store_product_routes())
}

/// Build the application router with its state attached.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the product store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(backend = state.store().name(), error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
