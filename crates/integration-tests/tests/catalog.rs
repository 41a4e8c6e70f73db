//! Catalog pages and their HTMX fragments.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use digishelf_integration_tests::{TestContext, product_json};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_pages_render_loading_shells() {
    let ctx = TestContext::start().await;

    let home = ctx.get("/").await.text().await.unwrap();
    assert!(home.contains(r#"hx-get="/fragments/featured""#));
    assert!(home.contains("Loading"));

    let detail = ctx.get("/product/5").await.text().await.unwrap();
    assert!(detail.contains(r#"hx-get="/fragments/product/5""#));

    assert!(ctx.requests_to("/api/products").await.is_empty());
}

#[tokio::test]
async fn test_search_filters_by_title() {
    let ctx = TestContext::start().await;
    ctx.mock_products(json!([
        product_json(1, "Alpha", 500),
        product_json(2, "Beta", 700),
    ]))
    .await;

    let body = ctx
        .get("/fragments/products?q=al")
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Alpha"));
    assert!(!body.contains("Beta"));

    let requests = ctx.requests_to("/api/products").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_sort_by_price_ascending() {
    let ctx = TestContext::start().await;
    ctx.mock_products(json!([
        product_json(1, "Pricey", 900),
        product_json(2, "Cheap", 100),
        product_json(3, "Middle", 500),
    ]))
    .await;

    let body = ctx
        .get("/fragments/products?sort=price-asc")
        .await
        .text()
        .await
        .unwrap();

    let cheap = body.find("Cheap").unwrap();
    let middle = body.find("Middle").unwrap();
    let pricey = body.find("Pricey").unwrap();
    assert!(cheap < middle && middle < pricey);
}

#[tokio::test]
async fn test_unknown_sort_keeps_backend_order() {
    let ctx = TestContext::start().await;
    ctx.mock_products(json!([
        product_json(1, "Zebra", 900),
        product_json(2, "Aardvark", 100),
    ]))
    .await;

    let body = ctx
        .get("/fragments/products?sort=bogus")
        .await
        .text()
        .await
        .unwrap();

    assert!(body.find("Zebra").unwrap() < body.find("Aardvark").unwrap());
}

#[tokio::test]
async fn test_home_features_first_eight_products() {
    let ctx = TestContext::start().await;
    let products: Vec<_> = (1..=10)
        .map(|id| product_json(id, &format!("Item{id:02}"), 100))
        .collect();
    ctx.mock_products(json!(products)).await;

    let body = ctx.get("/fragments/featured").await.text().await.unwrap();

    assert!(body.contains("Item01"));
    assert!(body.contains("Item08"));
    assert!(!body.contains("Item09"));
}

#[tokio::test]
async fn test_free_products_show_free() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(4, "Sampler", 0)).await;

    let body = ctx.get("/fragments/product/4").await.text().await.unwrap();

    assert!(body.contains("Sampler"));
    assert!(body.contains("Free"));
}

#[tokio::test]
async fn test_missing_product_renders_not_found_fragment() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.backend)
        .await;

    let response = ctx.get("/fragments/product/99").await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Product not found"));

    let body = ctx
        .get("/fragments/product/not-a-number")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Product not found"));
    assert_eq!(ctx.requests_to("/api/products/99").await.len(), 1);
}

#[tokio::test]
async fn test_backend_failure_renders_error_fragment() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": "Catalog is offline"})),
        )
        .mount(&ctx.backend)
        .await;

    let body = ctx.get("/fragments/products").await.text().await.unwrap();
    assert!(body.contains("Catalog is offline"));
}

#[tokio::test]
async fn test_unknown_path_renders_404() {
    let ctx = TestContext::start().await;

    let response = ctx.get("/no/such/page").await;

    assert_eq!(response.status(), 404);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.text().await.unwrap().contains("Page not found"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::start().await;
    assert_eq!(ctx.get("/health").await.text().await.unwrap(), "ok");

    assert_eq!(ctx.get("/health/ready").await.status(), 503);
    ctx.mock_products(json!([])).await;
    assert_eq!(ctx.get("/health/ready").await.status(), 200);
}
