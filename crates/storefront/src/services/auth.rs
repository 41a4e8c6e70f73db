//! Authentication service.
//!
//! The marketplace API checks credentials and issues tokens; this service
//! only validates the form, forwards it, and records the outcome in the
//! visitor's session. A failed attempt leaves the session untouched.

use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use digishelf_core::{Email, EmailError};

use crate::api::{ApiError, MarketplaceClient};
use crate::middleware::{clear_auth_session, current_auth, set_auth_session};
use crate::models::AuthSession;

/// Errors that can occur during authentication operations.
///
/// `Display` output is shown to the visitor as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    /// Empty password field.
    #[error("Password is required")]
    MissingPassword,

    /// The marketplace refused the credentials.
    #[error("{0}")]
    Rejected(String),

    /// The session store failed.
    #[error("Something went wrong, please try again")]
    Session(#[from] tower_sessions::session::Error),
}

#[derive(Debug, Clone, Copy)]
enum Flow {
    Login,
    Register,
}

impl Flow {
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    api: &'a MarketplaceClient,
    session: &'a Session,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service for one visitor.
    #[must_use]
    pub const fn new(api: &'a MarketplaceClient, session: &'a Session) -> Self {
        Self { api, session }
    }

    /// Sign in with existing credentials.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] whose message is fit for display.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.authenticate(Flow::Login, email, password).await
    }

    /// Create an account and sign in to it.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] whose message is fit for display.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.authenticate(Flow::Register, email, password).await
    }

    /// Sign out. Later API calls for this visitor carry no credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Session`] if the session store fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        clear_auth_session(self.session).await?;
        tracing::info!("Visitor signed out");
        Ok(())
    }

    /// The signed-in visitor, if any.
    pub async fn current(&self) -> Option<AuthSession> {
        current_auth(self.session).await
    }

    async fn authenticate(
        &self,
        flow: Flow,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let result = match flow {
            Flow::Login => self.api.login(email.as_str(), password).await,
            Flow::Register => self.api.register(email.as_str(), password).await,
        };

        let token = result.map_err(|e| {
            tracing::warn!(?flow, "Authentication failed: {e}");
            rejection(&e, flow)
        })?;

        let auth = AuthSession::new(email, token);
        // New identity, new session id
        self.session.cycle_id().await?;
        set_auth_session(self.session, &auth).await?;
        tracing::info!(?flow, "Visitor signed in");

        Ok(auth)
    }
}

fn rejection(err: &ApiError, flow: Flow) -> AuthError {
    AuthError::Rejected(err.user_message(flow.fallback_message()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tower_sessions::MemoryStore;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    async fn api_for(server: &MockServer) -> MarketplaceClient {
        MarketplaceClient::new(&Url::parse(&server.uri()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_login_stores_token_in_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1"})))
            .mount(&server)
            .await;
        let api = api_for(&server).await;
        let session = new_session();
        let auth = AuthService::new(&api, &session);

        let signed_in = auth.login("buyer@example.com", "hunter22").await.unwrap();

        assert_eq!(signed_in.email.as_str(), "buyer@example.com");
        let current = auth.current().await.unwrap();
        assert_eq!(current.email.as_str(), "buyer@example.com");
        assert!(current.bearer().is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Wrong password"})),
            )
            .mount(&server)
            .await;
        let api = api_for(&server).await;
        let session = new_session();
        let auth = AuthService::new(&api, &session);

        let err = auth.login("buyer@example.com", "nope").await.unwrap_err();

        assert_eq!(err.to_string(), "Wrong password");
        assert!(auth.current().await.is_none());
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let api = api_for(&server).await;
        let session = new_session();

        let err = AuthService::new(&api, &session)
            .register("new@example.com", "pw")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Registration failed");
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t"})))
            .expect(0)
            .mount(&server)
            .await;
        let api = api_for(&server).await;
        let session = new_session();
        let auth = AuthService::new(&api, &session);

        let err = auth.login("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));

        let err = auth.register("a@b.co", "").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingPassword));
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-2"})))
            .mount(&server)
            .await;
        let api = api_for(&server).await;
        let session = new_session();
        let auth = AuthService::new(&api, &session);

        auth.register("new@example.com", "pw").await.unwrap();
        auth.logout().await.unwrap();

        assert!(auth.current().await.is_none());
    }
}
