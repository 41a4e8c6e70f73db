//! Admin panel against a mock marketplace.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use digishelf_integration_tests::TestContext;
use reqwest::multipart;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_admin_requires_session() {
    let ctx = TestContext::start().await;

    let response = ctx.get("/admin").await;

    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "/auth?next=%2Fadmin");
}

#[tokio::test]
async fn test_anonymous_form_post_returns_to_admin_page() {
    let ctx = TestContext::start().await;

    let response = ctx
        .post_form(
            "/admin/products",
            &[("title", "Field Notes"), ("description", ""), ("price", "100")],
        )
        .await;

    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "/auth?next=%2Fadmin");
    assert!(ctx.requests_to("/api/admin/products").await.is_empty());
}

#[tokio::test]
async fn test_create_product_shows_new_id() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .and(header("authorization", "Bearer admin-tok"))
        .and(body_json(json!({
            "title": "Field Notes",
            "description": "A notebook",
            "price": 1200,
            "coverImageUrl": "https://cdn.example.com/notes.png",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12})))
        .expect(1)
        .mount(&ctx.backend)
        .await;

    ctx.sign_in("admin@example.com", "admin-tok").await;
    let body = ctx
        .post_form(
            "/admin/products",
            &[
                ("title", "  Field Notes "),
                ("description", "A notebook"),
                ("price", "1200"),
                ("cover_image_url", "https://cdn.example.com/notes.png"),
            ],
        )
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Created product #12"));
    assert!(body.contains(r#"action="/admin/products/12/file""#));
}

#[tokio::test]
async fn test_invalid_price_is_rejected_locally() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(0)
        .mount(&ctx.backend)
        .await;

    ctx.sign_in("admin@example.com", "admin-tok").await;
    let body = ctx
        .post_form(
            "/admin/products",
            &[("title", "Field Notes"), ("price", "12.50")],
        )
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Invalid price"));
}

#[tokio::test]
async fn test_create_failure_shows_generic_message() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Forbidden"})))
        .mount(&ctx.backend)
        .await;

    ctx.sign_in("admin@example.com", "admin-tok").await;
    let body = ctx
        .post_form("/admin/products", &[("title", "X"), ("price", "1")])
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Failed to create product"));
}

#[tokio::test]
async fn test_upload_file_shows_stored_path() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/products/12/file"))
        .and(header("authorization", "Bearer admin-tok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"filePath": "uploads/12/notes.pdf"})),
        )
        .expect(1)
        .mount(&ctx.backend)
        .await;

    ctx.sign_in("admin@example.com", "admin-tok").await;
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(b"%PDF-1.7".to_vec()).file_name("notes.pdf"),
    );
    let body = ctx
        .client
        .post(ctx.url("/admin/products/12/file"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Uploaded to uploads/12/notes.pdf"));
}

#[tokio::test]
async fn test_upload_failure_shows_generic_message() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/products/12/file"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.backend)
        .await;

    ctx.sign_in("admin@example.com", "admin-tok").await;
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(b"data".to_vec()).file_name("notes.pdf"),
    );
    let body = ctx
        .client
        .post(ctx.url("/admin/products/12/file"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Upload failed"));
}
