//! Marketplace REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`; the backend owns all data
//! - No local sync and no caching: every page view fetches what it shows
//! - No retries and no client-side timeouts; failures surface immediately
//! - Credentials are attached per request by [`Bearer`], which handlers build
//!   from the visitor's session at call time
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/products                 -> [Product]
//! GET  /api/products/{id}            -> Product | 404
//! POST /api/auth/login               -> {token} | {error}
//! POST /api/auth/register            -> {token} | {error}
//! POST /api/checkout                 -> {downloadUrl} | {error}   (bearer)
//! POST /api/admin/products           -> {id}                      (bearer)
//! POST /api/admin/products/{id}/file -> {filePath}                (bearer, multipart)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let client = MarketplaceClient::new(&config.api_base_url)?;
//! let products = client.list_products(&Bearer::anonymous()).await?;
//! ```

mod bearer;
mod client;
pub mod types;

pub use bearer::Bearer;
pub use client::MarketplaceClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("(no message)"))]
    Server {
        status: u16,
        /// The `error` field of the response body, when the backend sent one.
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The error message reported by the backend, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Message to show the visitor: the backend's own words when it sent
    /// any, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Server {
            status: 402,
            message: Some("Payment required".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 402 - Payment required");

        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: 500 - (no message)");
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Server {
            status: 400,
            message: Some("Product is not for sale".to_string()),
        };
        assert_eq!(err.user_message("Checkout error"), "Product is not for sale");

        let err = ApiError::Parse("unexpected EOF".to_string());
        assert_eq!(err.user_message("Checkout error"), "Checkout error");
    }
}
