//! Per-request credential decorator.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// The credential to attach to one outbound request.
///
/// Built from the visitor's session when the request is made, so a login or
/// logout takes effect on the very next call. An anonymous `Bearer` leaves
/// the request untouched.
#[derive(Clone, Default)]
pub struct Bearer(Option<SecretString>);

impl Bearer {
    /// No credential.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// Authenticate with `token`.
    #[must_use]
    pub const fn token(token: SecretString) -> Self {
        Self(Some(token))
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    /// Add `Authorization: Bearer <token>` when a token is present.
    pub(crate) fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.0 {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

impl std::fmt::Debug for Bearer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = if self.is_authenticated() {
            "[REDACTED]"
        } else {
            "anonymous"
        };
        f.debug_tuple("Bearer").field(&value).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decorate_adds_authorization_header() {
        let client = reqwest::Client::new();
        let bearer = Bearer::token(SecretString::from("tok-123"));

        let request = bearer
            .decorate(client.get("http://localhost/api/products"))
            .build()
            .unwrap();

        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer tok-123"
        );
    }

    #[test]
    fn test_anonymous_leaves_request_untouched() {
        let client = reqwest::Client::new();
        let request = Bearer::anonymous()
            .decorate(client.get("http://localhost/api/products"))
            .build()
            .unwrap();

        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let bearer = Bearer::token(SecretString::from("tok-123"));
        let debug_output = format!("{bearer:?}");
        assert!(!debug_output.contains("tok-123"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
