//! Integration test harness for the Digishelf storefront.
//!
//! Each [`TestContext`] serves a fresh storefront on an ephemeral port,
//! pointed at its own `wiremock` marketplace backend, and drives it with a
//! cookie-carrying client that does not follow redirects.
//!
//! ```rust,ignore
//! let ctx = TestContext::start().await;
//! ctx.mock_products(json!([])).await;
//! let body = ctx.get("/fragments/products").await.text().await.unwrap();
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use reqwest::{Client, Response, redirect::Policy};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use digishelf_storefront::{app, config::StorefrontConfig, state::AppState};

/// Session secret used by every test server.
pub const TEST_SESSION_SECRET: &str =
    "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%dF8(gH1)jK3_lM5+nP7=qR9-sT2~vX4?";

/// A running storefront and its mock backend.
pub struct TestContext {
    pub backend: MockServer,
    pub client: Client,
    base_url: String,
}

impl TestContext {
    /// Start a storefront backed by a fresh mock marketplace.
    pub async fn start() -> Self {
        let backend = MockServer::start().await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let api_base_url = backend.uri();
        let public_url = base_url.clone();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_API_BASE_URL" => Some(api_base_url.clone()),
            "STOREFRONT_BASE_URL" => Some(public_url.clone()),
            "STOREFRONT_SESSION_SECRET" => Some(TEST_SESSION_SECRET.to_string()),
            _ => None,
        })
        .unwrap();

        let router = app(AppState::new(config).unwrap()).unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            backend,
            client,
            base_url,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Serve `products` from `GET /api/products`.
    pub async fn mock_products(&self, products: Value) {
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products))
            .mount(&self.backend)
            .await;
    }

    /// Serve one product from `GET /api/products/{id}`.
    pub async fn mock_product(&self, product: Value) {
        let id = product["id"].as_i64().unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/api/products/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(product))
            .mount(&self.backend)
            .await;
    }

    /// Sign in as `email`; the backend issues `token`.
    pub async fn sign_in(&self, email: &str, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .mount(&self.backend)
            .await;

        let response = self
            .post_form(
                "/auth/login",
                &[("email", email), ("password", "secret"), ("next", "/")],
            )
            .await;
        assert_eq!(response.status(), 303, "sign in should redirect");
    }

    /// Add one unit of a product to the cart. The product must be mocked.
    pub async fn add_to_cart(&self, product_id: i64) {
        let id = product_id.to_string();
        let response = self
            .post_form("/cart/add", &[("product_id", id.as_str()), ("quantity", "1")])
            .await;
        assert_eq!(response.status(), 200, "add to cart should succeed");
    }

    /// Current cart badge count.
    pub async fn cart_count(&self) -> u32 {
        let body = self.get("/cart/count").await.text().await.unwrap();
        body.trim().parse().unwrap()
    }

    /// Requests the backend has received for `path`.
    pub async fn requests_to(&self, path: &str) -> Vec<Request> {
        self.backend
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }
}

/// Backend JSON for a product.
#[must_use]
pub fn product_json(id: i64, title: &str, price: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("About {title}"),
        "price": price,
        "coverImageUrl": format!("https://cdn.example.com/{id}.png"),
        "filePath": format!("files/{id}.zip"),
    })
}
