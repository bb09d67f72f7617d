//! Store route handlers for the extended product listing.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use extended_products_core::ExtendedProduct;

use super::products::parse_product_id;
use crate::error::AppError;
use crate::services::ExtendedProductPage;
use crate::state::AppState;
use crate::store::ProductQuery;

/// List products with their extended fields.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ExtendedProductPage>, AppError> {
    let page = state.products().list_extended(query).await?;
    Ok(Json(page))
}

/// Show a single product with its extended fields.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExtendedProduct>, AppError> {
    let id = parse_product_id(id)?;
    let product = state.products().retrieve_extended(&id).await?;
    Ok(Json(product))
}
