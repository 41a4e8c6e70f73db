//! Digishelf Core - Shared domain types.
//!
//! This crate provides the types used by the Digishelf storefront:
//! - products and the admin payload for creating them
//! - prices in the smallest currency unit
//! - the shopping cart and its merge rules
//! - catalog filtering and sorting
//! - the load state every page view moves through
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session handling. The storefront crate owns all of that.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and domain models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
