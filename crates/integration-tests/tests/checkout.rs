//! Cart and checkout flows against a mock marketplace.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use digishelf_integration_tests::{TestContext, product_json};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_checkout(ctx: &TestContext, product_id: i64, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/checkout"))
        .and(body_json(json!({"productId": product_id})))
        .respond_with(response)
        .mount(&ctx.backend)
        .await;
}

fn download(url: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"downloadUrl": url}))
}

#[tokio::test]
async fn test_cart_merges_and_removes_lines() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;
    ctx.mock_product(product_json(2, "Bestiary", 300)).await;

    ctx.add_to_cart(1).await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(2).await;
    assert_eq!(ctx.cart_count().await, 3);

    let cart = ctx.get("/cart").await.text().await.unwrap();
    assert!(cart.contains("Atlas"));
    assert!(cart.contains("$13.00"));

    ctx.post_form("/cart/remove", &[("product_id", "1")]).await;
    assert_eq!(ctx.cart_count().await, 1);
    let cart = ctx.get("/cart").await.text().await.unwrap();
    assert!(!cart.contains("Atlas"));
    assert!(cart.contains("Bestiary"));

    ctx.post_form("/cart/update", &[("product_id", "2"), ("quantity", "4")])
        .await;
    assert_eq!(ctx.cart_count().await, 4);

    ctx.post_form("/cart/clear", &[]).await;
    assert_eq!(ctx.cart_count().await, 0);
}

#[tokio::test]
async fn test_add_signals_cart_update() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;

    let response = ctx
        .post_form("/cart/add", &[("product_id", "1")])
        .await;

    assert_eq!(response.headers()["hx-trigger"], "cart-updated");
    assert_eq!(response.text().await.unwrap().trim(), "1");
}

#[tokio::test]
async fn test_add_with_blank_quantity_adds_one() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;

    let response = ctx
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "")])
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_checkout_without_session_never_calls_backend() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;
    Mock::given(method("POST"))
        .and(path("/api/checkout"))
        .respond_with(download("https://dl.example.com/1"))
        .expect(0)
        .mount(&ctx.backend)
        .await;
    ctx.add_to_cart(1).await;

    let summary = ctx.get("/checkout").await.text().await.unwrap();
    assert!(summary.contains("/auth?next=%2Fcheckout"));

    let response = ctx.post_form("/checkout", &[]).await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Log in to check out"));

    let response = ctx.post_form("/product/1/checkout", &[]).await;
    assert!(response.text().await.unwrap().contains("/auth?next=%2Fproduct%2F1"));

    assert!(ctx.requests_to("/api/checkout").await.is_empty());
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_checkout_success_clears_cart_and_redirects() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;
    mock_checkout(&ctx, 1, download("https://dl.example.com/atlas.zip")).await;

    ctx.sign_in("reader@example.com", "tok-9").await;
    ctx.add_to_cart(1).await;

    let response = ctx.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers()["location"],
        "https://dl.example.com/atlas.zip"
    );
    assert_eq!(ctx.cart_count().await, 0);

    let checkout = ctx.requests_to("/api/checkout").await;
    assert_eq!(checkout.len(), 1);
    assert_eq!(checkout[0].headers["authorization"], "Bearer tok-9");
}

#[tokio::test]
async fn test_checkout_failure_keeps_cart_and_shows_error() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;
    mock_checkout(
        &ctx,
        1,
        ResponseTemplate::new(402).set_body_json(json!({"error": "Payment declined"})),
    )
    .await;

    ctx.sign_in("reader@example.com", "tok-9").await;
    ctx.add_to_cart(1).await;

    let response = ctx.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Payment declined"));
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_multi_line_checkout_lists_downloads() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;
    ctx.mock_product(product_json(2, "Bestiary", 300)).await;
    mock_checkout(&ctx, 1, download("https://dl.example.com/1.zip")).await;
    mock_checkout(&ctx, 2, download("https://dl.example.com/2.zip")).await;

    ctx.sign_in("reader@example.com", "tok-9").await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(2).await;

    let response = ctx.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("https://dl.example.com/1.zip"));
    assert!(body.contains("https://dl.example.com/2.zip"));
    assert_eq!(ctx.cart_count().await, 0);
}

#[tokio::test]
async fn test_buy_now_redirects_to_download() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/checkout"))
        .and(header("authorization", "Bearer tok-9"))
        .and(body_json(json!({"productId": 3})))
        .respond_with(download("https://dl.example.com/3.zip"))
        .expect(1)
        .mount(&ctx.backend)
        .await;

    ctx.sign_in("reader@example.com", "tok-9").await;
    let response = ctx.post_form("/product/3/checkout", &[]).await;

    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "https://dl.example.com/3.zip");
}

#[tokio::test]
async fn test_buy_now_success_clears_whole_cart() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;
    ctx.mock_product(product_json(2, "Bestiary", 300)).await;
    mock_checkout(&ctx, 1, download("https://dl.example.com/1.zip")).await;

    ctx.sign_in("reader@example.com", "tok-9").await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(2).await;
    assert_eq!(ctx.cart_count().await, 2);

    let response = ctx.post_form("/product/1/checkout", &[]).await;

    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "https://dl.example.com/1.zip");
    assert_eq!(ctx.cart_count().await, 0);
}

#[tokio::test]
async fn test_buy_now_failure_keeps_cart() {
    let ctx = TestContext::start().await;
    ctx.mock_product(product_json(1, "Atlas", 500)).await;
    ctx.mock_product(product_json(2, "Bestiary", 300)).await;
    mock_checkout(
        &ctx,
        1,
        ResponseTemplate::new(409).set_body_json(json!({"error": "Already owned"})),
    )
    .await;

    ctx.sign_in("reader@example.com", "tok-9").await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(2).await;

    let response = ctx.post_form("/product/1/checkout", &[]).await;

    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Already owned"));
    assert_eq!(ctx.cart_count().await, 2);
}

#[tokio::test]
async fn test_missing_download_url_is_a_checkout_error() {
    let ctx = TestContext::start().await;
    mock_checkout(&ctx, 3, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    ctx.sign_in("reader@example.com", "tok-9").await;
    let body = ctx
        .post_form("/product/3/checkout", &[])
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Checkout error"));
}
