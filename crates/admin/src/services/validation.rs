//! Product update validation.
//!
//! [`BaseUpdateValidator`] covers what the store itself requires of an update.
//! [`ExtendedUpdateValidator`] wraps any validator and adds the rules for the
//! extended fields (`videos`, `properties`, `visits`). The extended rules are
//! inert unless enforcement is switched on.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use extended_products_core::{ExtendedAttributes, ProductProperty, ProductUpdate};

/// Hosts accepted for video links.
pub const VIDEO_HOST_ALLOWLIST: &[&str] = &["youtube.com", "youtu.be", "m.youtube.com"];

const PROPERTY_KEY_MIN_LEN: usize = 2;
const PROPERTY_KEY_MAX_LEN: usize = 50;
const PROPERTY_VALUE_MAX_LEN: usize = 1024;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid update: {}", join_errors(.0))]
pub struct ValidationError(pub Vec<FieldError>);

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Extra fields accepted alongside a product update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtendedUpdateFields {
    pub videos: Option<Vec<String>>,
    pub properties: Option<Vec<ProductProperty>>,
    pub visits: Option<i64>,
}

impl From<&ExtendedAttributes> for ExtendedUpdateFields {
    fn from(attributes: &ExtendedAttributes) -> Self {
        Self {
            videos: Some(attributes.video_links.clone()),
            properties: Some(attributes.properties.clone()),
            visits: Some(i64::try_from(attributes.visit_count).unwrap_or(i64::MAX)),
        }
    }
}

/// Validates a product update request.
pub trait UpdateValidator: Send + Sync {
    /// Return every problem found; an empty list means the update is valid.
    fn check(&self, update: &ProductUpdate, extended: &ExtendedUpdateFields) -> Vec<FieldError>;

    /// Validate and fold the problems into a single error.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every rejected field.
    fn validate(
        &self,
        update: &ProductUpdate,
        extended: &ExtendedUpdateFields,
    ) -> Result<(), ValidationError> {
        let errors = self.check(update, extended);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(errors))
        }
    }
}

/// The store's own requirements: metadata keys must not be blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseUpdateValidator;

impl UpdateValidator for BaseUpdateValidator {
    fn check(&self, update: &ProductUpdate, _extended: &ExtendedUpdateFields) -> Vec<FieldError> {
        update
            .metadata
            .iter()
            .flat_map(|m| m.keys())
            .filter(|key| key.trim().is_empty())
            .map(|_| FieldError::new("metadata", "keys must not be blank"))
            .take(1)
            .collect()
    }
}

/// Adds the extended-field rules on top of another validator.
#[derive(Debug, Clone, Default)]
pub struct ExtendedUpdateValidator<V> {
    inner: V,
    enforced: bool,
}

impl<V: UpdateValidator> ExtendedUpdateValidator<V> {
    #[must_use]
    pub const fn new(inner: V, enforced: bool) -> Self {
        Self { inner, enforced }
    }

    #[must_use]
    pub const fn is_enforced(&self) -> bool {
        self.enforced
    }
}

impl<V: UpdateValidator> UpdateValidator for ExtendedUpdateValidator<V> {
    fn check(&self, update: &ProductUpdate, extended: &ExtendedUpdateFields) -> Vec<FieldError> {
        let mut errors = self.inner.check(update, extended);
        if self.enforced {
            errors.extend(check_extended(extended));
        }
        errors
    }
}

/// Apply the extended-field rules.
#[must_use]
pub fn check_extended(fields: &ExtendedUpdateFields) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for (i, link) in fields.videos.iter().flatten().enumerate() {
        if let Err(message) = check_video_url(link) {
            errors.push(FieldError::new(format!("videos[{i}]"), message));
        }
    }

    for (i, property) in fields.properties.iter().flatten().enumerate() {
        let key_len = property.key.chars().count();
        if property.key.trim().is_empty() {
            errors.push(FieldError::new(format!("properties[{i}].key"), "must not be empty"));
        } else if !(PROPERTY_KEY_MIN_LEN..=PROPERTY_KEY_MAX_LEN).contains(&key_len) {
            errors.push(FieldError::new(
                format!("properties[{i}].key"),
                format!("must be {PROPERTY_KEY_MIN_LEN}-{PROPERTY_KEY_MAX_LEN} characters (got {key_len})"),
            ));
        }
        let value_len = property.value.chars().count();
        if value_len > PROPERTY_VALUE_MAX_LEN {
            errors.push(FieldError::new(
                format!("properties[{i}].value"),
                format!("must be at most {PROPERTY_VALUE_MAX_LEN} characters (got {value_len})"),
            ));
        }
    }

    if let Some(visits) = fields.visits.filter(|v| *v < 0) {
        errors.push(FieldError::new("visits", format!("must not be negative (got {visits})")));
    }

    errors
}

/// A video link must be an `https` URL on an allowed host.
fn check_video_url(link: &str) -> Result<(), String> {
    let url = Url::parse(link).map_err(|e| format!("not a valid URL ({e})"))?;
    if url.scheme() != "https" {
        return Err(format!("must use https (got {})", url.scheme()));
    }
    match url.host_str() {
        Some(host) if VIDEO_HOST_ALLOWLIST.contains(&host) => Ok(()),
        Some(host) => Err(format!("host {host} is not allowed")),
        None => Err("must include a host".to_string()),
    }
}
