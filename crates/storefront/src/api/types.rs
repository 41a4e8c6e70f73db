//! Request and response bodies for the marketplace API.

use serde::{Deserialize, Serialize};

use digishelf_core::ProductId;

/// Body for `/api/auth/login` and `/api/auth/register`.
#[derive(Debug, Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `{token}` or `{error}`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: Option<String>,
    pub error: Option<String>,
}

/// Body for `/api/checkout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutRequest {
    pub product_id: ProductId,
}

/// `{downloadUrl}` or `{error}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutResponse {
    pub download_url: Option<String>,
    pub error: Option<String>,
}

/// Any error body the backend sends.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Result of creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedProduct {
    pub id: ProductId,
}

/// Result of attaching a file to a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_path: String,
}

/// A file to attach to a product.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
