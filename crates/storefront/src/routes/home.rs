//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::NavView;
use super::products::{ProductGridTemplate, fetch_products, settled_fragment};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Number of products featured on the home page.
pub const FEATURED_COUNT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
}

/// Display the home page shell. Featured products load in a fragment.
pub async fn home(auth: OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        nav: NavView::from_auth(&auth),
    }
}

/// Featured products fragment (HTMX, on load).
#[instrument(skip(state, auth))]
pub async fn featured(State(state): State<AppState>, auth: OptionalAuth) -> Response {
    let featured = fetch_products(&state, &auth).await.map(|mut products| {
        products.truncate(FEATURED_COUNT);
        products
    });

    settled_fragment(featured, |products| {
        ProductGridTemplate {
            products,
            empty_message: "No products yet. Check back soon.",
        }
        .into_response()
    })
}
