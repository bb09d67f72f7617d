//! Extended Products Admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Components
//!
//! - [`services::EditFormController`] - load, edit, reset and submit the
//!   extended fields of one product
//! - [`services::ExtendedProductService`] - cached product listing decorated
//!   with decoded extended fields
//! - [`services::ExtendedUpdateValidator`] - optional rules for the extended
//!   fields, off unless `EXTENDED_VALIDATION_ENFORCED` is set
//! - [`store`] - product store trait with `PostgreSQL` and in-memory backends

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
