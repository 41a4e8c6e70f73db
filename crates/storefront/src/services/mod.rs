//! Per-request services for storefront.
//!
//! Each service borrows what it needs (the API client, the visitor's
//! session) for the duration of one request. Handlers construct them
//! explicitly; there is no global state.
//!
//! # Services
//!
//! - `auth` - Login, registration, and logout against the marketplace API
//! - `cart` - The visitor's cart, kept in the session
//! - `checkout` - Exchanging products for download links

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use cart::CartStore;
pub use checkout::{CheckoutOutcome, CheckoutService, Download};
