//! Edit form controller for a single product's extended fields.
//!
//! Lifecycle:
//! 1. [`EditFormController::new`] decodes the product into form values
//! 2. the caller edits [`EditFormController::values_mut`]
//! 3. [`EditFormController::submit`] encodes the values, validates the update
//!    and sends it to the store
//!
//! A failed submit leaves the edited values in place so the same edit can be
//! resubmitted.

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument};

use extended_products_core::codec::DEFAULT_HIDDEN_KEYS;
use extended_products_core::{ExtendedAttributes, Product, ProductUpdate, decode, encode};

use super::extended_products::CacheInvalidator;
use super::notify::Notifier;
use super::validation::{ExtendedUpdateFields, UpdateValidator, ValidationError};
use crate::db::RepositoryError;
use crate::store::ProductStore;

/// Why a submit did not reach or was rejected by the store.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("update failed: {0}")]
    Store(#[from] RepositoryError),
}

/// Form state for one product plus its collaborators.
pub struct EditFormController<'a, S, N> {
    store: &'a S,
    validator: &'a dyn UpdateValidator,
    invalidator: &'a dyn CacheInvalidator,
    notifier: N,
    product: Product,
    values: ExtendedAttributes,
    saving: watch::Sender<bool>,
}

impl<'a, S: ProductStore, N: Notifier> EditFormController<'a, S, N> {
    /// Build a controller seeded from `product`.
    pub fn new(
        store: &'a S,
        validator: &'a dyn UpdateValidator,
        invalidator: &'a dyn CacheInvalidator,
        notifier: N,
        product: Product,
    ) -> Self {
        let values = decode_product(&product);
        Self {
            store,
            validator,
            invalidator,
            notifier,
            product,
            values,
            saving: watch::channel(false).0,
        }
    }

    /// Replace the current product and re-seed the form from it.
    pub fn load(&mut self, product: Product) {
        self.values = decode_product(&product);
        self.product = product;
    }

    /// Discard in-progress edits.
    pub fn reset(&mut self) {
        self.values = decode_product(&self.product);
    }

    pub const fn product(&self) -> &Product {
        &self.product
    }

    pub const fn values(&self) -> &ExtendedAttributes {
        &self.values
    }

    pub const fn values_mut(&mut self) -> &mut ExtendedAttributes {
        &mut self.values
    }

    pub fn set_values(&mut self, values: ExtendedAttributes) {
        self.values = values;
    }

    /// Whether an update is in flight.
    pub fn is_saving(&self) -> bool {
        *self.saving.borrow()
    }

    /// Watch the in-flight flag from outside the form, e.g. while `submit`
    /// holds it mutably.
    pub fn saving_state(&self) -> watch::Receiver<bool> {
        self.saving.subscribe()
    }

    pub fn into_notifier(self) -> N {
        self.notifier
    }

    /// Send the edited values to the store.
    ///
    /// On success the form is reloaded from the stored product and cached
    /// listings are dropped.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Validation` if the update is rejected before it
    /// is sent, or `SubmitError::Store` if the store fails.
    #[instrument(skip(self), fields(product_id = %self.product.id))]
    pub async fn submit(&mut self) -> Result<&Product, SubmitError> {
        let update = ProductUpdate {
            description: Some(self.values.description.clone()),
            metadata: Some(encode(&self.values)),
        };
        let extended = ExtendedUpdateFields::from(&self.values);

        if let Err(e) = self.validator.validate(&update, &extended) {
            self.notifier.error("Error", &e.to_string());
            return Err(e.into());
        }

        self.saving.send_replace(true);
        let result = self.store.update(&self.product.id, update).await;
        self.saving.send_replace(false);

        match result {
            Ok(product) => {
                info!("Extended product information saved");
                self.notifier.success(
                    "Success",
                    &format!("Extended information for product {} updated", product.title),
                );
                self.load(product);
                self.invalidator.invalidate_lists();
                Ok(&self.product)
            }
            Err(e) => {
                self.notifier.error("Error", &e.to_string());
                Err(e.into())
            }
        }
    }
}

fn decode_product(product: &Product) -> ExtendedAttributes {
    decode(
        product.description.as_deref(),
        product.metadata.as_ref(),
        DEFAULT_HIDDEN_KEYS,
    )
}
