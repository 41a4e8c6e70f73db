//! Authentication route handlers.
//!
//! Login and registration share one page. Credentials go to the
//! marketplace; on success the visitor returns to `next`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::NavView;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login and register form data.
#[derive(Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("next", &self.next)
            .finish()
    }
}

/// Query parameters for the auth page.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub next: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login and register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/page.html")]
pub struct AuthPageTemplate {
    pub nav: NavView,
    pub next: String,
    pub email: String,
    pub login_error: Option<String>,
    pub register_error: Option<String>,
}

/// Where to send the visitor after signing in. Only local paths are
/// accepted; anything else goes home.
fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        next
    } else {
        "/"
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login and register forms.
pub async fn page(auth: OptionalAuth, Query(query): Query<AuthQuery>) -> impl IntoResponse {
    AuthPageTemplate {
        nav: NavView::from_auth(&auth),
        next: safe_next(&query.next).to_string(),
        email: String::new(),
        login_error: None,
        register_error: None,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let result = AuthService::new(state.api(), &session)
        .login(&form.email, &form.password)
        .await;
    finish(result, form, |page, message| page.login_error = Some(message))
}

/// Handle registration form submission.
#[instrument(skip(state, session))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let result = AuthService::new(state.api(), &session)
        .register(&form.email, &form.password)
        .await;
    finish(result, form, |page, message| {
        page.register_error = Some(message);
    })
}

/// Handle logout.
#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    AuthService::new(state.api(), &session).logout().await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

/// Redirect on success; otherwise re-render the page with the error under
/// the form that was submitted.
fn finish(
    result: Result<crate::models::AuthSession, AuthError>,
    form: CredentialsForm,
    show_error: impl FnOnce(&mut AuthPageTemplate, String),
) -> Response {
    let next = safe_next(&form.next).to_string();
    match result {
        Ok(auth) => {
            set_sentry_user(auth.email.as_str());
            Redirect::to(&next).into_response()
        }
        Err(err) => {
            tracing::info!("Authentication failed: {err}");
            let mut page = AuthPageTemplate {
                nav: NavView::default(),
                next,
                email: form.email,
                login_error: None,
                register_error: None,
            };
            show_error(&mut page, err.to_string());
            page.into_response()
        }
    }
}
