//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (loading shell)
//! GET  /fragments/featured        - Featured products (HTMX, on load)
//!
//! # Catalog
//! GET  /products                  - Product listing with search and sort
//! GET  /fragments/products        - Listing results (HTMX, ?q=&sort=)
//! GET  /product/{id}              - Product detail (loading shell)
//! GET  /fragments/product/{id}    - Product detail (HTMX, on load)
//! POST /product/{id}/checkout     - Buy one product now
//!
//! # Cart (HTMX fragments)
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add to cart (returns count, triggers cart-updated)
//! POST /cart/update               - Update quantity (returns cart_items fragment)
//! POST /cart/remove               - Remove line (returns cart_items fragment)
//! POST /cart/clear                - Empty cart (returns cart_items fragment)
//! GET  /cart/count                - Cart count badge (fragment)
//!
//! # Checkout (requires auth, prompts otherwise)
//! GET  /checkout                  - Order summary
//! POST /checkout                  - Buy everything in the cart
//!
//! # Auth
//! GET  /auth                      - Login and register forms (?next=)
//! POST /auth/login                - Login action
//! POST /auth/register             - Register action
//! POST /auth/logout               - Logout action
//!
//! # Admin (requires auth)
//! GET  /admin                     - Admin panel (?product= selects upload target)
//! POST /admin/products            - Create product
//! POST /admin/products/{id}/file  - Upload product file (multipart)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Header navigation data shared by every full page.
#[derive(Clone, Default)]
pub struct NavView {
    /// Email of the signed-in visitor.
    pub email: Option<String>,
}

impl NavView {
    #[must_use]
    pub fn from_auth(auth: &OptionalAuth) -> Self {
        Self {
            email: auth.0.as_ref().map(|a| a.email.to_string()),
        }
    }
}

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub nav: NavView,
}

/// Fallback for unknown paths.
pub async fn not_found(auth: OptionalAuth) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            nav: NavView::from_auth(&auth),
        },
    )
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .route("/product/{id}", get(products::show))
        .route("/product/{id}/checkout", post(checkout::buy_now))
}

/// Create the HTMX fragment routes router.
pub fn fragment_routes() -> Router<AppState> {
    Router::new()
        .route("/featured", get(home::featured))
        .route("/products", get(products::list_fragment))
        .route("/product/{id}", get(products::detail_fragment))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::page))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}/file",
            post(admin::upload_file).layer(DefaultBodyLimit::max(admin::MAX_UPLOAD_BYTES)),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/fragments", fragment_routes())
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            get(checkout::show).post(checkout::checkout_cart),
        )
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
}
