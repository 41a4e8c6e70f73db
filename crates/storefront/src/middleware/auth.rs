//! Authentication extractors.
//!
//! Provides extractors for reading the signed-in visitor in route handlers.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{AuthSession, session_keys};

/// Extractor that requires a signed-in visitor.
///
/// If nobody is signed in, redirects to `/auth` with a `next` parameter
/// pointing back at the requested page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.email)
/// }
/// ```
pub struct RequireAuth(pub AuthSession);

/// Error returned when authentication is required but the visitor is not signed in.
pub enum AuthRejection {
    /// Redirect to the auth page, then back to `next`.
    RedirectToLogin { next: String },
    /// The session layer is missing.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => {
                Redirect::to(&login_url(&next)).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// URL of the auth page that returns to `next` afterwards.
#[must_use]
pub fn login_url(next: &str) -> String {
    format!("/auth?next={}", urlencoding::encode(next))
}

/// Page to come back to after logging in.
///
/// Only a GET can be replayed by a redirect. Any other method returns to the
/// top of its section (`POST /admin/products` comes back to `/admin`).
fn return_path(method: &Method, path: &str) -> String {
    if method == Method::GET {
        return path.to_string();
    }
    match path.trim_start_matches('/').split('/').next() {
        Some(section) if !section.is_empty() => format!("/{section}"),
        _ => "/".to_string(),
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        // Nested routers see a stripped URI; return to the full path.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |uri| uri.0.path());
        let next = return_path(&parts.method, path);

        current_auth(session)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin { next })
    }
}

/// Extractor that optionally gets the signed-in visitor.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// signed in.
pub struct OptionalAuth(pub Option<AuthSession>);

impl OptionalAuth {
    /// Credential for calls made on this visitor's behalf.
    #[must_use]
    pub fn bearer(&self) -> crate::api::Bearer {
        self.0
            .as_ref()
            .map_or_else(crate::api::Bearer::anonymous, AuthSession::bearer)
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>() {
            Some(session) => current_auth(session).await,
            None => None,
        };

        Ok(Self(auth))
    }
}

/// Read the signed-in visitor from the session.
///
/// Store errors are logged and treated as "not signed in".
pub async fn current_auth(session: &Session) -> Option<AuthSession> {
    match session.get::<AuthSession>(session_keys::AUTH_SESSION).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!("Failed to read auth session: {e}");
            None
        }
    }
}

/// Helper to store the signed-in visitor in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_session(
    session: &Session,
    auth: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_SESSION, auth).await
}

/// Helper to remove the signed-in visitor from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthSession>(session_keys::AUTH_SESSION)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/checkout"), "/auth?next=%2Fcheckout");
    }

    #[test]
    fn test_return_path_keeps_get_target() {
        assert_eq!(return_path(&Method::GET, "/admin"), "/admin");
        assert_eq!(return_path(&Method::GET, "/product/4"), "/product/4");
    }

    #[test]
    fn test_return_path_sends_form_posts_to_section() {
        assert_eq!(return_path(&Method::POST, "/admin/products"), "/admin");
        assert_eq!(return_path(&Method::POST, "/admin/products/3/file"), "/admin");
        assert_eq!(return_path(&Method::POST, "/"), "/");
    }
}
