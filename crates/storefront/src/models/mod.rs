//! Session-held models for the storefront.

pub mod session;

pub use session::{AuthSession, keys as session_keys};
