//! Checkout route handlers.
//!
//! Checkout needs a signed-in visitor. Without one these handlers render a
//! login prompt and never call the marketplace.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use digishelf_core::{Cart, ProductId};

use super::NavView;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, login_url};
use crate::services::{CartStore, CheckoutService, Download};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Order summary template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: NavView,
    pub cart: Cart,
}

/// Shown instead of checkout when nobody is signed in.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/login_prompt.html")]
pub struct LoginPromptTemplate {
    pub nav: NavView,
    pub login_href: String,
}

impl LoginPromptTemplate {
    fn returning_to(next: &str) -> Self {
        Self {
            nav: NavView::default(),
            login_href: login_url(next),
        }
    }
}

/// Download links, plus the error that stopped checkout if any.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/downloads.html")]
pub struct DownloadsTemplate {
    pub nav: NavView,
    pub downloads: Vec<Download>,
    pub error: Option<String>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the order summary, or a login prompt.
#[instrument(skip(session, auth))]
pub async fn show(session: Session, auth: OptionalAuth) -> Response {
    if auth.0.is_none() {
        return LoginPromptTemplate::returning_to("/checkout").into_response();
    }

    CheckoutTemplate {
        nav: NavView::from_auth(&auth),
        cart: CartStore::new(&session).load().await,
    }
    .into_response()
}

/// Check out the whole cart.
///
/// One product bought: redirect to its download. Several: list them.
#[instrument(skip(state, session, auth))]
pub async fn checkout_cart(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
) -> Result<Response, AppError> {
    if auth.0.is_none() {
        return Ok(LoginPromptTemplate::returning_to("/checkout").into_response());
    }

    let cart = CartStore::new(&session);
    if cart.load().await.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let outcome = CheckoutService::new(state.api(), auth.bearer())
        .buy_cart(&cart)
        .await?;

    if let Some(url) = outcome.sole_download() {
        return Ok(Redirect::to(url).into_response());
    }

    Ok(DownloadsTemplate {
        nav: NavView::from_auth(&auth),
        downloads: outcome.downloads,
        error: outcome.error,
    }
    .into_response())
}

/// Buy one product straight from its detail page.
///
/// On success the cart is cleared and the browser goes to the download.
#[instrument(skip(state, session, auth))]
pub async fn buy_now(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Response, AppError> {
    if auth.0.is_none() {
        let next = format!("/product/{product_id}");
        return Ok(LoginPromptTemplate::returning_to(&next).into_response());
    }

    match CheckoutService::new(state.api(), auth.bearer())
        .buy(product_id)
        .await
    {
        Ok(url) => {
            CartStore::new(&session).clear().await?;
            Ok(Redirect::to(&url).into_response())
        }
        Err(message) => Ok(DownloadsTemplate {
            nav: NavView::from_auth(&auth),
            downloads: Vec::new(),
            error: Some(message),
        }
        .into_response()),
    }
}
