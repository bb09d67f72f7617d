//! Core types for extended products.
//!
//! This module provides type-safe wrappers for product records, their
//! generic metadata, and the named product properties.

pub mod id;
pub mod metadata;
pub mod product;
pub mod properties;
pub mod status;

pub use id::*;
pub use metadata::{MetadataEntry, MetadataForm, MetadataMap, PrimitiveValue};
pub use product::{ExtendedProduct, Product, ProductUpdate, ProductVariant};
pub use properties::{ProductProperty, PropertyKey, canonical_properties, find_property};
pub use status::*;
