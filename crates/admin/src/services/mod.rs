//! Business logic services for admin.
//!
//! # Services
//!
//! - `edit_form` - Edit form controller for a product's extended fields
//! - `extended_products` - Cached listing of products with decoded extended fields
//! - `notify` - Success/error notifications raised by the form
//! - `validation` - Update validators, including the extended-field rules

pub mod edit_form;
pub mod extended_products;
pub mod notify;
pub mod validation;

pub use edit_form::{EditFormController, SubmitError};
pub use extended_products::{CacheInvalidator, ExtendedProductPage, ExtendedProductService};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier, TracingNotifier};
pub use validation::{
    BaseUpdateValidator, ExtendedUpdateFields, ExtendedUpdateValidator, FieldError, UpdateValidator,
    ValidationError,
};
