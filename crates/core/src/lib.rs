//! Extended Products Core - Shared types and the metadata codec.
//!
//! This crate provides the pieces shared by every extended-products component:
//! - `admin` - HTTP service for editing and listing extended products
//! - `cli` - Command-line tools for migrations, seeding and inspection
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, IDs, generic metadata and named properties
//! - [`codec`] - Lossless mapping between [`codec::ExtendedAttributes`] and the
//!   flat metadata object stored on a product

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod types;

pub use codec::{ExtendedAttributes, decode, encode};
pub use types::*;
