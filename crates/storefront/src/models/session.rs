//! Session-related types.
//!
//! Types stored in the visitor's session. The session store plays the role a
//! browser's local storage would: it is the only place the auth token and
//! the cart live.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use digishelf_core::Email;

use crate::api::Bearer;

/// The signed-in visitor: the token the marketplace issued and the email it
/// was issued for.
///
/// Token and identity are stored as a single value under a single key, so
/// there is never an identity without a token.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Email the visitor signed in with.
    pub email: Email,
    #[serde(serialize_with = "expose_token", deserialize_with = "secret_token")]
    token: SecretString,
}

impl AuthSession {
    #[must_use]
    pub fn new(email: Email, token: impl Into<String>) -> Self {
        Self {
            email,
            token: SecretString::from(token.into()),
        }
    }

    /// Credential for calls made on this visitor's behalf.
    #[must_use]
    pub fn bearer(&self) -> Bearer {
        Bearer::token(self.token.clone())
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

fn expose_token<S: Serializer>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose_secret())
}

fn secret_token<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Session keys.
pub mod keys {
    /// Key for the signed-in visitor ([`super::AuthSession`]).
    pub const AUTH_SESSION: &str = "auth_session";

    /// Key for the visitor's cart.
    pub const CART: &str = "cart";
}
