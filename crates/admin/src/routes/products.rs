//! Admin route handlers for the extended product form.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use extended_products_core::{ExtendedAttributes, Product, ProductId};

use crate::error::AppError;
use crate::services::{EditFormController, Notification, NotificationLog, TracingNotifier};
use crate::state::AppState;
use crate::store::ProductStore;

/// Form values for one product.
#[derive(Debug, Serialize)]
pub struct ExtendedFormResponse {
    pub product: Product,
    pub values: ExtendedAttributes,
    /// Notifications raised while handling the request.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}

pub(crate) fn parse_product_id(id: String) -> Result<ProductId, AppError> {
    ProductId::parse(id).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Show the decoded extended form values for a product.
#[instrument(skip(state))]
pub async fn show_extended(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExtendedFormResponse>, AppError> {
    let id = parse_product_id(id)?;
    let product = state.store().get_by_id(&id).await?;

    let form = EditFormController::new(
        state.store(),
        state.validator(),
        state.products(),
        TracingNotifier,
        product,
    );

    Ok(Json(ExtendedFormResponse {
        product: form.product().clone(),
        values: form.values().clone(),
        notifications: Vec::new(),
    }))
}

/// Submit edited extended form values for a product.
///
/// The form is loaded from the stored product, replaced with the submitted
/// values and saved. The response carries the reloaded values and the
/// notification raised.
#[instrument(skip(state, values))]
pub async fn update_extended(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(values): Json<ExtendedAttributes>,
) -> Result<Json<ExtendedFormResponse>, AppError> {
    let id = parse_product_id(id)?;
    let product = state.store().get_by_id(&id).await?;

    let mut form = EditFormController::new(
        state.store(),
        state.validator(),
        state.products(),
        NotificationLog::new(),
        product,
    );
    form.set_values(values);
    form.submit().await?;

    let product = form.product().clone();
    let values = form.values().clone();

    Ok(Json(ExtendedFormResponse {
        product,
        values,
        notifications: form.into_notifier().into_inner(),
    }))
}
