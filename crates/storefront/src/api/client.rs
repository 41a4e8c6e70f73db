//! HTTP client for the marketplace API.

use reqwest::{Method, RequestBuilder, Response, StatusCode, multipart};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use digishelf_core::{NewProduct, Product, ProductId};

use super::bearer::Bearer;
use super::types::{
    CheckoutRequest, CheckoutResponse, CreatedProduct, CredentialsRequest, ErrorBody,
    FileUpload, TokenResponse, UploadedFile,
};
use super::ApiError;

/// Client for the marketplace REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct MarketplaceClient {
    client: reqwest::Client,
    base_url: String,
}

impl MarketplaceClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("digishelf-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Start a request to `path`, carrying `bearer`'s credential if it has one.
    fn request(&self, method: Method, path: &str, bearer: &Bearer) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        bearer.decorate(self.client.request(method, url))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product list.
    #[instrument(skip(self, bearer))]
    pub async fn list_products(&self, bearer: &Bearer) -> Result<Vec<Product>, ApiError> {
        let response = self
            .request(Method::GET, "/api/products", bearer)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch one product. A 404 from the backend yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product.
    #[instrument(skip(self, bearer), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        bearer: &Bearer,
        id: ProductId,
    ) -> Result<Option<Product>, ApiError> {
        let response = self
            .request(Method::GET, &format!("/api/products/{id}"), bearer)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Server`] carrying the backend's `error` message
    /// when the credentials are rejected.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.token_request("/api/auth/login", email, password).await
    }

    /// Create an account and return its session token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Server`] carrying the backend's `error` message
    /// when registration is refused.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.token_request("/api/auth/register", email, password)
            .await
    }

    async fn token_request(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let response = self
            .request(Method::POST, path, &Bearer::anonymous())
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        let body: TokenResponse = read_json(response).await?;
        match body.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::Server {
                status: status.as_u16(),
                message: body.error,
            }),
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Buy a product and return its download link.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Server`] when the backend refuses the purchase or
    /// answers without a download link.
    #[instrument(skip(self, bearer), fields(product_id = %product_id))]
    pub async fn checkout(
        &self,
        bearer: &Bearer,
        product_id: ProductId,
    ) -> Result<String, ApiError> {
        let response = self
            .request(Method::POST, "/api/checkout", bearer)
            .json(&CheckoutRequest { product_id })
            .send()
            .await?;

        let status = response.status();
        let body: CheckoutResponse = read_json(response).await?;
        match body.download_url {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ApiError::Server {
                status: status.as_u16(),
                message: body.error,
            }),
        }
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses it.
    #[instrument(skip(self, bearer, product), fields(title = %product.title))]
    pub async fn create_product(
        &self,
        bearer: &Bearer,
        product: &NewProduct,
    ) -> Result<CreatedProduct, ApiError> {
        let response = self
            .request(Method::POST, "/api/admin/products", bearer)
            .json(product)
            .send()
            .await?;
        read_json(response).await
    }

    /// Attach a downloadable file to an existing product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses it.
    #[instrument(skip(self, bearer, file), fields(product_id = %id, file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_product_file(
        &self,
        bearer: &Bearer,
        id: ProductId,
        file: FileUpload,
    ) -> Result<UploadedFile, ApiError> {
        let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(mime) = file.content_type.as_deref()
            && !mime.trim().is_empty()
        {
            part = part.mime_str(mime)?;
        }
        let form = multipart::Form::new().part("file", part);

        let response = self
            .request(
                Method::POST,
                &format!("/api/admin/products/{id}/file"),
                bearer,
            )
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Decode a JSON body, turning non-success statuses into [`ApiError::Server`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.error);
        tracing::warn!(status = status.as_u16(), ?message, "marketplace API error");
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
}
