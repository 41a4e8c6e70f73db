//! Core types for Digishelf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{Cart, CartLine, CartProduct};
pub use catalog::{SortOrder, filter_by_title, sort_products};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError, format_price};
pub use product::{NewProduct, Product, ProductError};
pub use status::LoadState;
