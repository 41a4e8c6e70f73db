//! Product listing and detail route handlers.
//!
//! Pages render a loading shell; the catalog fetch happens in an HTMX
//! fragment requested on load, which settles into ready, not-found, or
//! error markup. Fragments always answer 200 so HTMX swaps them in.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use digishelf_core::{LoadState, Product, ProductId, SortOrder, filter_by_title, sort_products};

use super::NavView;
use crate::api::ApiError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Title search, case-insensitive.
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
}

impl CatalogQuery {
    fn order(&self) -> SortOrder {
        SortOrder::from_param(self.sort.as_deref())
    }
}

/// A sort option on the listing page.
#[derive(Clone)]
pub struct SortLink {
    pub label: &'static str,
    pub value: &'static str,
    pub href: String,
    pub active: bool,
}

const SORT_OPTIONS: [(SortOrder, &str); 4] = [
    (SortOrder::Featured, "Featured"),
    (SortOrder::PriceAsc, "Price: low to high"),
    (SortOrder::PriceDesc, "Price: high to low"),
    (SortOrder::Title, "Title"),
];

fn sort_links(query: &str, current: SortOrder) -> Vec<SortLink> {
    SORT_OPTIONS
        .iter()
        .map(|&(order, label)| SortLink {
            label,
            value: order.as_param(),
            href: listing_href(query, order),
            active: order == current,
        })
        .collect()
}

fn listing_href(query: &str, order: SortOrder) -> String {
    let mut href = format!("/products?sort={}", order.as_param());
    if !query.trim().is_empty() {
        href.push_str("&q=");
        href.push_str(&urlencoding::encode(query));
    }
    href
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavView,
    pub query: String,
    pub sort: &'static str,
    pub sort_links: Vec<SortLink>,
    /// Fragment URL carrying the initial query and sort.
    pub results_url: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub detail_url: String,
}

/// Product grid fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<Product>,
    pub empty_message: &'static str,
}

/// Product detail fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_detail.html")]
pub struct ProductDetailTemplate {
    pub product: Product,
}

/// Not-found fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/not_found.html")]
pub struct NotFoundFragment;

/// Load-error fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/load_error.html")]
pub struct LoadErrorTemplate {
    pub message: String,
}

/// Loading placeholder fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/loading.html")]
pub struct LoadingTemplate;

// =============================================================================
// Fetch Helpers
// =============================================================================

/// Fetch the full catalog and settle it into a load state.
pub async fn fetch_products(state: &AppState, auth: &OptionalAuth) -> LoadState<Vec<Product>> {
    LoadState::settle(
        state
            .api()
            .list_products(&auth.bearer())
            .await
            .map(Some)
            .map_err(|e| load_failure(&e, "Failed to load products")),
    )
}

async fn fetch_product(state: &AppState, auth: &OptionalAuth, id: &str) -> LoadState<Product> {
    // A malformed id can never exist upstream.
    let Ok(id) = id.parse::<ProductId>() else {
        return LoadState::NotFound;
    };

    LoadState::settle(
        state
            .api()
            .get_product(&auth.bearer(), id)
            .await
            .map_err(|e| load_failure(&e, "Failed to load product")),
    )
}

fn load_failure(err: &ApiError, fallback: &str) -> String {
    tracing::warn!("Catalog fetch failed: {err}");
    err.user_message(fallback)
}

/// Render the fragment for a settled load state.
pub fn settled_fragment<T>(state: LoadState<T>, ready: impl FnOnce(T) -> Response) -> Response {
    match state {
        LoadState::Ready(value) => ready(value),
        LoadState::NotFound => NotFoundFragment.into_response(),
        LoadState::Error(message) => LoadErrorTemplate { message }.into_response(),
        LoadState::Loading => LoadingTemplate.into_response(),
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the product listing page shell.
pub async fn index(auth: OptionalAuth, Query(query): Query<CatalogQuery>) -> impl IntoResponse {
    let order = query.order();
    let mut results_url = format!("/fragments/products?sort={}", order.as_param());
    if !query.q.is_empty() {
        results_url.push_str("&q=");
        results_url.push_str(&urlencoding::encode(&query.q));
    }

    ProductsIndexTemplate {
        nav: NavView::from_auth(&auth),
        sort: order.as_param(),
        sort_links: sort_links(&query.q, order),
        results_url,
        query: query.q,
    }
}

/// Listing results fragment: filter by title, then sort.
#[instrument(skip(state, auth))]
pub async fn list_fragment(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let order = query.order();
    let products = fetch_products(&state, &auth).await.map(|products| {
        let mut matches = filter_by_title(products, &query.q);
        sort_products(&mut matches, order);
        matches
    });

    settled_fragment(products, |products| {
        ProductGridTemplate {
            products,
            empty_message: "No products match your search.",
        }
        .into_response()
    })
}

/// Display the product detail page shell.
pub async fn show(auth: OptionalAuth, Path(id): Path<String>) -> impl IntoResponse {
    ProductShowTemplate {
        nav: NavView::from_auth(&auth),
        detail_url: format!("/fragments/product/{}", urlencoding::encode(&id)),
    }
}

/// Product detail fragment.
#[instrument(skip(state, auth))]
pub async fn detail_fragment(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<String>,
) -> Response {
    settled_fragment(fetch_product(&state, &auth, &id).await, |product| {
        ProductDetailTemplate { product }.into_response()
    })
}
